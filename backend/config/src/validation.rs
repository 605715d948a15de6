//! Config validation with field paths and user-friendly messages.

use crate::schema::PsychoScoreConfig;
use thiserror::Error;

/// Upper bound on the downsample target; anything larger defeats its purpose.
const MAX_SANE_DIMENSION: u32 = 8192;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
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
pub fn validate(config: &PsychoScoreConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_backends(config, &mut report);
    validate_limits(config, &mut report);
    report
}

fn validate_server(config: &PsychoScoreConfig, report: &mut ValidationReport) {
    let port = config.server.port;
    if port == 0 {
        report.error("server.port", "Port must be > 0");
    } else if port < 1024 && port != 80 && port != 443 {
        report.warn(
            "server.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        );
    }
}

/// Missing keys are warnings: the service still serves health and audio files.
fn validate_backends(config: &PsychoScoreConfig, report: &mut ValidationReport) {
    if config.gemini.api_key.is_none() {
        report.warn("gemini.apiKey", "No Gemini API key; analysis requests will fail");
    }
    if config.elevenlabs.api_key.is_none() {
        report.warn(
            "elevenlabs.apiKey",
            "No ElevenLabs API key; audio generation will fail",
        );
    }
    for (path, url) in [
        ("gemini.baseUrl", &config.gemini.base_url),
        ("elevenlabs.baseUrl", &config.elevenlabs.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error(path, format!("Expected an http(s) URL, got {url:?}"));
        }
    }
}

fn validate_limits(config: &PsychoScoreConfig, report: &mut ValidationReport) {
    let limits = &config.limits;
    if limits.max_file_size == 0 {
        report.error("limits.maxFileSize", "maxFileSize must be > 0");
    }
    if limits.max_text_chars == 0 {
        report.error("limits.maxTextChars", "maxTextChars must be > 0");
    }
    if limits.max_image_dimension == 0 || limits.max_image_dimension > MAX_SANE_DIMENSION {
        report.error(
            "limits.maxImageDimension",
            format!("maxImageDimension must be within 1..={MAX_SANE_DIMENSION}"),
        );
    }
    for ty in &limits.allowed_image_types {
        if !ty.starts_with("image/") {
            report.error(
                "limits.allowedImageTypes",
                format!("{ty:?} is not an image content type"),
            );
        }
    }
}
