//! Serving stored files back to clients.
//!
//! Lookup failures come back as [`ScoreError`] so the HTTP layer renders them
//! with the same error body as every other endpoint.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use psychoscore_core::ScoreError;
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_inline_safe};
use crate::store::FileStore;

/// A file read from a [`FileStore`], ready to be sent.
#[derive(Debug)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub async fn load_media_file(store: &FileStore, name: &str) -> Result<MediaFile, ScoreError> {
    let path = store.resolve(name).inspect_err(|_| {
        warn!(filename = %name, "Rejected suspicious media path");
    })?;
    debug!(path = %path.display(), "Serving media file");

    match fs::read(&path).await {
        Ok(bytes) => Ok(MediaFile {
            name: name.to_string(),
            mime_type: detect_mime_type(&path),
            bytes,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ScoreError::NotFound("Audio file not found".to_string()))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read media file");
            Err(e.into())
        }
    }
}

impl IntoResponse for MediaFile {
    fn into_response(self) -> Response {
        let kind = if is_inline_safe(self.mime_type) { "inline" } else { "attachment" };
        let disposition = HeaderValue::from_str(&format!("{kind}; filename=\"{}\"", self.name))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(self.mime_type)),
                (header::CONTENT_DISPOSITION, disposition),
                (header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=86400")),
            ],
            self.bytes,
        )
            .into_response()
    }
}
