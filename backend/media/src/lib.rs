//! Media handling: upload validation, image normalization, uniquely named
//! file storage, and serving stored files back over HTTP.

use bytes::Bytes;

pub mod image;
pub mod media_server;
pub mod mime_detect;
pub mod store;

pub use crate::image::{ImageNormalizer, NormalizedImage, UploadPolicy};
pub use media_server::{load_media_file, MediaFile};
pub use mime_detect::{content_type_essence, detect_mime_type, extension_for_mime, is_inline_safe};
pub use store::{FileStore, StoredFile};

/// An image exactly as the caller uploaded it. Read once into an owned buffer;
/// every consumer gets a borrowed view or a cheap `Bytes` clone.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub data: Bytes,
    /// Declared by the client; may be empty when the multipart part had none.
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadedImage {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
