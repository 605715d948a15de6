//! Config defaults: constants, `Default` impls, and the post-load fill-in pass.

use crate::schema::{
    ElevenLabsConfig, GeminiConfig, LimitsConfig, LoggingConfig, PsychoScoreConfig, ServerConfig,
    StorageConfig,
};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
/// Deep, measured male voice.
pub const DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
pub const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_monolingual_v1";
pub const DEFAULT_ELEVENLABS_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_IMAGE_UPLOAD_PATH: &str = "uploads/images";
pub const DEFAULT_AUDIO_OUTPUT_PATH: &str = "outputs/audio";

/// 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 2048;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 5000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
        }
    }
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_ELEVENLABS_MODEL.to_string(),
            timeout_secs: DEFAULT_ELEVENLABS_TIMEOUT_SECS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_upload_path: DEFAULT_IMAGE_UPLOAD_PATH.into(),
            audio_output_path: DEFAULT_AUDIO_OUTPUT_PATH.into(),
            persist_uploads: false,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_image_types: DEFAULT_ALLOWED_IMAGE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
            json: false,
        }
    }
}

/// Fill values that deserialized but are blank, and normalise the rest.
pub fn apply_all_defaults(config: PsychoScoreConfig) -> PsychoScoreConfig {
    let config = apply_backend_defaults(config);
    let config = apply_limit_defaults(config);
    apply_logging_defaults(config)
}

/// Blank keys become `None`; blank URLs, models and voices fall back.
fn apply_backend_defaults(mut config: PsychoScoreConfig) -> PsychoScoreConfig {
    config.gemini.api_key = non_blank(config.gemini.api_key.take());
    config.elevenlabs.api_key = non_blank(config.elevenlabs.api_key.take());

    fill_blank(&mut config.gemini.model, DEFAULT_GEMINI_MODEL);
    fill_blank(&mut config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
    fill_blank(&mut config.elevenlabs.base_url, DEFAULT_ELEVENLABS_BASE_URL);
    fill_blank(&mut config.elevenlabs.default_voice_id, DEFAULT_VOICE_ID);
    fill_blank(&mut config.elevenlabs.model_id, DEFAULT_ELEVENLABS_MODEL);

    for url in [&mut config.gemini.base_url, &mut config.elevenlabs.base_url] {
        while url.ends_with('/') {
            url.pop();
        }
    }

    if config.gemini.timeout_secs == 0 {
        config.gemini.timeout_secs = DEFAULT_GEMINI_TIMEOUT_SECS;
    }
    if config.elevenlabs.timeout_secs == 0 {
        config.elevenlabs.timeout_secs = DEFAULT_ELEVENLABS_TIMEOUT_SECS;
    }
    config
}

/// Content types are compared lower-case; an empty allow-list means the defaults.
fn apply_limit_defaults(mut config: PsychoScoreConfig) -> PsychoScoreConfig {
    let mut types: Vec<String> = config
        .limits
        .allowed_image_types
        .iter()
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    types.dedup();
    if types.is_empty() {
        types = LimitsConfig::default().allowed_image_types;
    }
    config.limits.allowed_image_types = types;
    config
}

fn apply_logging_defaults(mut config: PsychoScoreConfig) -> PsychoScoreConfig {
    fill_blank(&mut config.logging.level, DEFAULT_LOG_LEVEL);
    config
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn fill_blank(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_keys_become_none() {
        let mut config = PsychoScoreConfig::default();
        config.gemini.api_key = Some("   ".into());
        let config = apply_all_defaults(config);
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn allowed_types_are_lowercased_and_never_empty() {
        let mut config = PsychoScoreConfig::default();
        config.limits.allowed_image_types = vec![" IMAGE/PNG ".into()];
        let config = apply_all_defaults(config);
        assert_eq!(config.limits.allowed_image_types, vec!["image/png"]);

        let mut config = PsychoScoreConfig::default();
        config.limits.allowed_image_types.clear();
        let config = apply_all_defaults(config);
        assert_eq!(config.limits.allowed_image_types.len(), 3);
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_base_urls() {
        let mut config = PsychoScoreConfig::default();
        config.elevenlabs.base_url = "http://localhost:9999/v1/".into();
        let config = apply_all_defaults(config);
        assert_eq!(config.elevenlabs.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn zero_timeouts_fall_back() {
        let mut config = PsychoScoreConfig::default();
        config.elevenlabs.timeout_secs = 0;
        let config = apply_all_defaults(config);
        assert_eq!(config.elevenlabs.timeout_secs, 60);
    }
}
