use thiserror::Error;

/// Top-level error type for the PsychoScore service.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Caller supplied something we refuse to process (type, size, empty text).
    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The backend answered, but with a non-success status.
    #[error("{provider} API error ({status}): {message}")]
    Upstream {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: String },

    #[error("request to {provider} failed: {message}")]
    Transport { provider: String, message: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether the failure originated at one of the external backends.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Timeout { .. } | Self::Transport { .. }
        )
    }
}

impl From<std::io::Error> for ScoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
