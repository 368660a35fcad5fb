//! Default values for every config field.

use snapstory_core::{DEFAULT_REQUEST_BUDGET_MS, MAX_UPLOAD_BYTES};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Upper bound on any single AI call, in milliseconds.
pub const DEFAULT_AI_TIMEOUT_MS: u64 = 20_000;

pub const DEFAULT_PRIMARY_CLASSIFIER_MODEL: &str = "microsoft/resnet-50";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SECONDARY_CLASSIFIER_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_TEXT_PROVIDER: &str = "openrouter";
pub const DEFAULT_TEXT_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
pub const DEFAULT_TEXT_MAX_TOKENS: u32 = 160;
pub const DEFAULT_TEXT_TEMPERATURE: f32 = 0.7;

pub fn bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

pub fn port() -> u16 {
    DEFAULT_PORT
}

pub fn allowed_origins() -> Vec<String> {
    vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
}

pub fn max_upload_bytes() -> usize {
    MAX_UPLOAD_BYTES
}

pub fn log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn ai_timeout_ms() -> u64 {
    DEFAULT_AI_TIMEOUT_MS
}

pub fn request_budget_ms() -> u64 {
    DEFAULT_REQUEST_BUDGET_MS
}

pub fn text_provider() -> String {
    DEFAULT_TEXT_PROVIDER.to_string()
}

pub fn text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

pub fn text_max_tokens() -> u32 {
    DEFAULT_TEXT_MAX_TOKENS
}

pub fn text_temperature() -> f32 {
    DEFAULT_TEXT_TEMPERATURE
}
