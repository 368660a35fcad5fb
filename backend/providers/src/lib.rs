pub mod mock;
pub mod ollama;
pub mod openrouter;
pub mod registry;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openrouter::OpenRouterProvider;
pub use registry::ProviderRegistry;
