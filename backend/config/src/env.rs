//! Environment variable handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside YAML string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${}` escapes to a
//!   literal `${}`.
//! - Well-known variables (`SNAPSTORY_PORT`, `OPENROUTER_API_KEY`, ...) that
//!   override individual fields after the file is loaded.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{ClassifierKind, SnapStoryConfig};

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply well-known environment overrides from the process environment.
pub fn apply_env_overrides(config: SnapStoryConfig) -> SnapStoryConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply well-known environment overrides from a provided map.
///
/// API keys only fill fields that are still empty; a key written in the
/// config file wins.
pub fn apply_env_overrides_with(
    mut config: SnapStoryConfig,
    env: &HashMap<String, String>,
) -> SnapStoryConfig {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(bind) = get("SNAPSTORY_BIND") {
        config.server.bind_address = bind;
    }
    if let Some(port) = get("SNAPSTORY_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(origins) = get("SNAPSTORY_ALLOWED_ORIGINS") {
        config.server.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(level) = get("RUST_LOG") {
        config.server.log_level = level;
    }
    if let Some(dir) = get("SNAPSTORY_LOG_DIR") {
        config.server.log_dir = Some(dir.into());
    }

    let hf_token = get("HF_API_TOKEN");
    let openrouter_key = get("OPENROUTER_API_KEY");
    let gemini_key = get("GEMINI_API_KEY");

    let classifiers = std::iter::once(&mut config.ai.primary_classifier)
        .chain(config.ai.secondary_classifier.as_mut());
    for classifier in classifiers {
        if classifier.api_key.is_some() {
            continue;
        }
        classifier.api_key = match classifier.kind {
            ClassifierKind::Huggingface => hf_token.clone(),
            ClassifierKind::OpenaiVision => openrouter_key.clone(),
            ClassifierKind::GeminiVision => gemini_key.clone(),
        };
    }

    match config.ai.text.provider.as_str() {
        "openrouter" if config.ai.text.api_key.is_none() => {
            config.ai.text.api_key = openrouter_key;
        }
        "ollama" => {
            if let Some(url) = get("OLLAMA_URL") {
                config.ai.text.base_url = Some(url);
            }
        }
        _ => {}
    }

    config
}
