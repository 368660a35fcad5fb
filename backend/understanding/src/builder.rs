//! Wire a [`RecognitionService`] from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use snapstory_config::defaults::DEFAULT_HF_BASE_URL;
use snapstory_config::{AiConfig, ClassifierConfig, ClassifierKind, TextConfig};
use snapstory_core::{Classifier, LlmProvider};
use snapstory_providers::{MockProvider, OllamaProvider, OpenRouterProvider, ProviderRegistry};
use tracing::info;

use crate::cascade::ClassifierCascade;
use crate::hf::HfImageClassifier;
use crate::service::RecognitionService;
use crate::story::TextSettings;
use crate::vision::{VisionBackend, VisionClassifier};

pub fn build_classifier(config: &ClassifierConfig) -> Arc<dyn Classifier> {
    let api_key = config.api_key.clone().unwrap_or_default();
    match config.kind {
        ClassifierKind::Huggingface => {
            let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_HF_BASE_URL);
            Arc::new(HfImageClassifier::new(base_url, &config.model).with_api_key(config.api_key.clone()))
        }
        ClassifierKind::OpenaiVision => {
            let mut backend = VisionBackend::openai(api_key, &config.model);
            if let Some(url) = &config.base_url {
                backend = backend.with_base_url(url);
            }
            Arc::new(VisionClassifier::new(backend))
        }
        ClassifierKind::GeminiVision => {
            Arc::new(VisionClassifier::new(VisionBackend::gemini(api_key, &config.model)))
        }
    }
}

/// Register every known text provider and pick the configured one.
pub fn build_text_provider(config: &TextConfig) -> Result<Arc<dyn LlmProvider>> {
    let mut registry = ProviderRegistry::new();

    let mut openrouter = OpenRouterProvider::new(config.api_key.clone().unwrap_or_default());
    let mut ollama = OllamaProvider::new();
    // A configured base URL belongs to the selected provider only.
    match (config.provider.as_str(), config.base_url.as_deref()) {
        ("openrouter", Some(url)) => openrouter = openrouter.with_base_url(url),
        ("ollama", Some(url)) => ollama = ollama.with_base_url(url),
        _ => {}
    }
    registry.register("openrouter", Arc::new(openrouter));
    registry.register("ollama", Arc::new(ollama));
    registry.register("mock", Arc::new(MockProvider::new("mock")));

    registry.get(&config.provider).ok_or_else(|| {
        anyhow!(
            "unknown text provider '{}' (available: {})",
            config.provider,
            registry.list().join(", ")
        )
    })
}

pub fn build_service(config: &AiConfig) -> Result<RecognitionService> {
    let timeout = Duration::from_millis(config.request_timeout_ms);

    let mut cascade = ClassifierCascade::new(build_classifier(&config.primary_classifier), timeout);
    if let Some(secondary) = &config.secondary_classifier {
        cascade = cascade.with_secondary(build_classifier(secondary));
    }

    let text = build_text_provider(&config.text)?;
    info!(
        primary = %config.primary_classifier.model,
        secondary = config.secondary_classifier.as_ref().map(|c| c.model.as_str()).unwrap_or("-"),
        text_provider = %text.name(),
        text_model = %config.text.model,
        "Recognition service configured"
    );

    let settings = TextSettings {
        model: config.text.model.clone(),
        max_tokens: config.text.max_tokens,
        temperature: config.text.temperature,
        timeout,
    };
    Ok(RecognitionService::new(cascade, text, settings)
        .with_budget(Duration::from_millis(config.request_budget_ms)))
}
