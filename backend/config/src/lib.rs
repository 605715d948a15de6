//! `psychoscore-config`: runtime configuration for the PsychoScore service.
//!
//! Provides:
//! - Typed config schema (server, backends, storage, limits, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment overrides using the service's well-known variable names
//! - Default value application
//! - Validation report
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, process_env, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw_config};
pub use redact::{redact, redact_value};
pub use schema::{
    ElevenLabsConfig, GeminiConfig, LimitsConfig, LoggingConfig, PsychoScoreConfig, ServerConfig,
    StorageConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at startup.
pub async fn load_and_prepare(path: &Path) -> Result<PsychoScoreConfig> {
    load_and_prepare_with(path, &process_env()).await
}

/// Same as [`load_and_prepare`] with an explicit environment (for tests).
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<PsychoScoreConfig> {
    let raw = load_raw_config(path).await?;
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: PsychoScoreConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    // Nothing is logged here: callers load config before installing a
    // subscriber, so every error travels in the returned message and warnings
    // are left to the caller.
    let report = validate(&config);
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("{}", errors.join("; "));
    }

    Ok(config)
}
