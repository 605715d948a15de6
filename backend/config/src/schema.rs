//! PsychoScore runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section has a `Default`
//! (see `defaults.rs`), so a partial or missing file still yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PsychoScoreConfig {
    /// HTTP listener
    pub server: ServerConfig,

    /// Vision-language backend
    pub gemini: GeminiConfig,

    /// Speech synthesis backend
    pub elevenlabs: ElevenLabsConfig,

    /// Upload and audio output directories
    pub storage: StorageConfig,

    /// Upload and text limits
    pub limits: LimitsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElevenLabsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    /// Voice used when a request does not name one.
    pub default_voice_id: String,
    pub model_id: String,
    pub timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Storage & limits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub image_upload_path: PathBuf,
    pub audio_output_path: PathBuf,
    /// Keep a best-effort copy of every accepted upload.
    pub persist_uploads: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LimitsConfig {
    /// Bytes
    pub max_file_size: usize,
    pub allowed_image_types: Vec<String>,
    /// Pixels, applied to both width and height
    pub max_image_dimension: u32,
    pub max_text_chars: usize,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the rolling NDJSON log; console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Emit console logs as JSON instead of human-readable lines.
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_fields() {
        let yaml = "server:\n  port: 9000\nlimits:\n  maxFileSize: 1024\n";
        let config: PsychoScoreConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, ServerConfig::default().bind);
        assert_eq!(config.limits.max_file_size, 1024);
        assert_eq!(config.limits.max_text_chars, 5000);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn empty_document_is_default() {
        let config: PsychoScoreConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PsychoScoreConfig::default());
    }
}
