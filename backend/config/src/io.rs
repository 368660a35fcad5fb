//! Config file discovery and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::env::resolve_env_vars;
use crate::schema::SnapStoryConfig;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the SnapStory config directory.
/// Priority: `SNAPSTORY_CONFIG_DIR` env > `~/.snapstory/` > `./.snapstory`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SNAPSTORY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".snapstory"),
        None => PathBuf::from(".snapstory"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk, resolving `${VAR}` references.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<SnapStoryConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(SnapStoryConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

fn parse_config(raw: &str) -> Result<SnapStoryConfig> {
    if raw.trim().is_empty() {
        return Ok(SnapStoryConfig::default());
    }
    let value: Value = serde_yaml::from_str(raw)?;
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => resolve_env_vars(&other)?,
    };
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("snapstory-config-does-not-exist.yaml");
        let config = load_config(&path).await.unwrap();
        assert_eq!(config, SnapStoryConfig::default());
    }

    #[tokio::test]
    async fn loads_yaml_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "snapstory-config-{}.yaml",
            std::process::id()
        ));
        fs::write(&path, "server:\n  port: 9911\n").await.unwrap();
        let config = load_config(&path).await.unwrap();
        let _ = fs::remove_file(&path).await;
        assert_eq!(config.server.port, 9911);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), SnapStoryConfig::default());
    }

    #[test]
    fn rejects_unknown_classifier_kind() {
        let yaml = "ai:\n  primaryClassifier:\n    kind: telepathy\n    model: x\n";
        assert!(parse_config(yaml).is_err());
    }
}
