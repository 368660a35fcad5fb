//! `snapstory-config`: SnapStory service configuration.
//!
//! Provides:
//! - Typed config schema (server surface, classifiers, text generation)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment-variable overrides for container deployments
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::{AiConfig, ClassifierConfig, ClassifierKind, ServerConfig, SnapStoryConfig, TextConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;
use tracing::warn;

/// Load a config file, substitute env references, apply env overrides and validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<SnapStoryConfig> {
    let config = apply_env_overrides(load_config(path).await?);
    ensure_valid(&config)?;
    Ok(config)
}

/// Log validation warnings and fail on the first error.
pub fn ensure_valid(config: &SnapStoryConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }
    Ok(())
}
