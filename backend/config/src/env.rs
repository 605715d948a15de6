//! Environment handling for config values.
//!
//! Two mechanisms, applied in this order:
//! 1. `${VAR_NAME}` references inside string values of the YAML file are
//!    substituted (`$${VAR}` escapes to a literal `${VAR}`).
//! 2. Well-known variables (`GEMINI_API_KEY`, `MAX_FILE_SIZE`, ...) override
//!    the corresponding fields directly, so the service runs with no file at all.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::PsychoScoreConfig;

/// `${VAR}` or the escaped form `$${VAR}`; only uppercase names match.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"));

/// Error returned for a referenced but unset variable.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in every string leaf of a config value tree.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let out = ENV_REF.replace_all(s, |caps: &Captures| {
        let whole = &caps[0];
        let name = &caps[1];
        if whole.starts_with("$$") {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(out.into_owned())
}

/// Override config fields from the well-known environment variables.
pub fn apply_env_overrides(
    mut config: PsychoScoreConfig,
    env: &HashMap<String, String>,
) -> Result<PsychoScoreConfig> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(v) = get("GEMINI_API_KEY") {
        config.gemini.api_key = Some(v.to_string());
    }
    if let Some(v) = get("GEMINI_MODEL") {
        config.gemini.model = v.to_string();
    }
    if let Some(v) = get("GEMINI_BASE_URL") {
        config.gemini.base_url = v.to_string();
    }
    if let Some(v) = get("ELEVENLABS_API_KEY") {
        config.elevenlabs.api_key = Some(v.to_string());
    }
    if let Some(v) = get("ELEVENLABS_BASE_URL") {
        config.elevenlabs.base_url = v.to_string();
    }
    if let Some(v) = get("PATRICK_VOICE_ID") {
        config.elevenlabs.default_voice_id = v.to_string();
    }
    if let Some(v) = get("IMAGE_UPLOAD_PATH") {
        config.storage.image_upload_path = v.into();
    }
    if let Some(v) = get("AUDIO_OUTPUT_PATH") {
        config.storage.audio_output_path = v.into();
    }
    if let Some(v) = get("PERSIST_UPLOADS") {
        config.storage.persist_uploads = parse_bool(v).context("PERSIST_UPLOADS")?;
    }
    if let Some(v) = get("MAX_FILE_SIZE") {
        config.limits.max_file_size = v
            .parse()
            .with_context(|| format!("MAX_FILE_SIZE must be a byte count, got {v:?}"))?;
    }
    if let Some(v) = get("ALLOWED_IMAGE_TYPES") {
        config.limits.allowed_image_types = v.split(',').map(|t| t.trim().to_string()).collect();
    }
    if let Some(v) = get("PSYCHOSCORE_BIND") {
        config.server.bind = v.to_string();
    }
    if let Some(v) = get("PSYCHOSCORE_PORT") {
        config.server.port = v
            .parse()
            .with_context(|| format!("PSYCHOSCORE_PORT must be a port number, got {v:?}"))?;
    }
    if let Some(v) = get("RUST_LOG") {
        config.logging.level = v.to_string();
    }
    if let Some(v) = get("PSYCHOSCORE_LOG_DIR") {
        config.logging.dir = Some(v.into());
    }
    Ok(config)
}

fn parse_bool(v: &str) -> Result<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
