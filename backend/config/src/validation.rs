//! Config validation: checks with user-friendly error messages.

use snapstory_core::{CLIENT_ATTEMPT_TIMEOUT_MS, MAX_UPLOAD_BYTES};
use thiserror::Error;

use crate::schema::{ClassifierConfig, SnapStoryConfig};

const KNOWN_TEXT_PROVIDERS: &[&str] = &["openrouter", "ollama", "mock"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SnapStoryConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_ai(config, &mut report);
    report
}

fn validate_server(config: &SnapStoryConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if server.allowed_origins.is_empty() {
        report.warn(
            "server.allowedOrigins",
            "No allowed origins; CORS responses will use '*'",
        );
    }
    for (i, origin) in server.allowed_origins.iter().enumerate() {
        if origin.trim().is_empty() {
            report.error(format!("server.allowedOrigins[{i}]"), "Origin cannot be empty");
        }
    }
    if server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Must be greater than 0");
    } else if server.max_upload_bytes > MAX_UPLOAD_BYTES {
        report.warn(
            "server.maxUploadBytes",
            format!("Exceeds the {MAX_UPLOAD_BYTES}-byte limit clients enforce"),
        );
    }
}

fn validate_ai(config: &SnapStoryConfig, report: &mut ValidationReport) {
    let ai = &config.ai;
    if ai.request_timeout_ms == 0 {
        report.error("ai.requestTimeoutMs", "Must be greater than 0");
    }
    if ai.request_budget_ms == 0 {
        report.error("ai.requestBudgetMs", "Must be greater than 0");
    } else if ai.request_budget_ms >= CLIENT_ATTEMPT_TIMEOUT_MS {
        report.warn(
            "ai.requestBudgetMs",
            format!(
                "Clients abort attempts after {CLIENT_ATTEMPT_TIMEOUT_MS} ms; fallback answers may arrive too late"
            ),
        );
    }

    validate_classifier("ai.primaryClassifier", &ai.primary_classifier, report);
    if let Some(secondary) = &ai.secondary_classifier {
        validate_classifier("ai.secondaryClassifier", secondary, report);
    }

    let text = &ai.text;
    if !KNOWN_TEXT_PROVIDERS.contains(&text.provider.as_str()) {
        report.error(
            "ai.text.provider",
            format!(
                "Unknown provider '{}'; expected one of {}",
                text.provider,
                KNOWN_TEXT_PROVIDERS.join(", ")
            ),
        );
    }
    if text.model.trim().is_empty() {
        report.error("ai.text.model", "Model cannot be empty");
    }
    if text.provider == "openrouter" && text.api_key.is_none() {
        report.warn(
            "ai.text.apiKey",
            "No API key; stories and translations will use fallback text",
        );
    }
    if !(0.0..=2.0).contains(&text.temperature) {
        report.error("ai.text.temperature", "Must be between 0.0 and 2.0");
    }
    if text.max_tokens == 0 {
        report.error("ai.text.maxTokens", "Must be greater than 0");
    }
}

fn validate_classifier(path: &str, classifier: &ClassifierConfig, report: &mut ValidationReport) {
    if classifier.model.trim().is_empty() {
        report.error(format!("{path}.model"), "Model cannot be empty");
    }
    if classifier.api_key.is_none() {
        report.warn(format!("{path}.apiKey"), "No API key configured");
    }
}
