//! Typed SnapStory configuration schema.
//!
//! Every section has serde defaults so a partial (or empty) YAML file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults;

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapStoryConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
    /// Origins echoed in CORS headers. Entries may be exact origins,
    /// `*.example.com` wildcards or `.example.com` suffixes. The first entry
    /// doubles as the fallback origin.
    #[serde(default = "defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "defaults::max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    /// When set, JSON logs also roll daily into this directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            port: defaults::port(),
            allowed_origins: defaults::allowed_origins(),
            max_upload_bytes: defaults::max_upload_bytes(),
            log_level: defaults::log_level(),
            log_dir: None,
        }
    }
}

/// Upstream AI providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    #[serde(default = "defaults::ai_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Deadline for all AI calls of one request together.
    #[serde(default = "defaults::request_budget_ms")]
    pub request_budget_ms: u64,
    #[serde(default = "ClassifierConfig::default_primary")]
    pub primary_classifier: ClassifierConfig,
    #[serde(default = "ClassifierConfig::default_secondary")]
    pub secondary_classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub text: TextConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: defaults::ai_timeout_ms(),
            request_budget_ms: defaults::request_budget_ms(),
            primary_classifier: ClassifierConfig::default_primary(),
            secondary_classifier: ClassifierConfig::default_secondary(),
            text: TextConfig::default(),
        }
    }
}

/// Which wire protocol a classifier speaks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Image-classification endpoint returning `[{label, score}]`.
    Huggingface,
    /// OpenAI-compatible chat completions with an image part.
    OpenaiVision,
    /// Gemini `generateContent` with inline image data.
    GeminiVision,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierConfig {
    pub kind: ClassifierKind,
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ClassifierConfig {
    pub fn default_primary() -> Self {
        Self {
            kind: ClassifierKind::Huggingface,
            model: defaults::DEFAULT_PRIMARY_CLASSIFIER_MODEL.to_string(),
            base_url: Some(defaults::DEFAULT_HF_BASE_URL.to_string()),
            api_key: None,
        }
    }

    pub fn default_secondary() -> Option<Self> {
        Some(Self {
            kind: ClassifierKind::OpenaiVision,
            model: defaults::DEFAULT_SECONDARY_CLASSIFIER_MODEL.to_string(),
            base_url: Some(defaults::DEFAULT_OPENROUTER_BASE_URL.to_string()),
            api_key: None,
        })
    }
}

/// Text generation for stories and translations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    /// One of `openrouter`, `ollama`, `mock`.
    #[serde(default = "defaults::text_provider")]
    pub provider: String,
    #[serde(default = "defaults::text_model")]
    pub model: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "defaults::text_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "defaults::text_temperature")]
    pub temperature: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            provider: defaults::text_provider(),
            model: defaults::text_model(),
            base_url: None,
            api_key: None,
            max_tokens: defaults::text_max_tokens(),
            temperature: defaults::text_temperature(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: SnapStoryConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SnapStoryConfig::default());
        assert_eq!(config.server.port, defaults::DEFAULT_PORT);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
server:
  port: 9000
  allowedOrigins: ["https://kids.example.com", "*.example.com"]
ai:
  secondaryClassifier: null
  text:
    provider: ollama
    model: llama3.2
"#;
        let config: SnapStoryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.server.bind_address, defaults::DEFAULT_BIND_ADDRESS);
        assert!(config.ai.secondary_classifier.is_none());
        assert_eq!(config.ai.text.provider, "ollama");
        assert_eq!(config.ai.text.max_tokens, defaults::DEFAULT_TEXT_MAX_TOKENS);
    }
}
