//! Upload validation and image normalization.
//!
//! Every accepted card image is decoded, flattened to 8-bit RGB, shrunk to fit
//! inside a square bound (never enlarged) and re-encoded as JPEG before it is
//! handed to the vision backend.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use psychoscore_config::LimitsConfig;
use psychoscore_core::{ImagePart, ScoreError};
use tracing::debug;

use crate::mime_detect::content_type_essence;
use crate::UploadedImage;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Which uploads are acceptable at all, checked before any decoding.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_types: Vec<String>,
    max_bytes: usize,
}

impl UploadPolicy {
    pub fn new<I, S>(allowed_types: I, max_bytes: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_types: allowed_types
                .into_iter()
                .map(|t| content_type_essence(t.as_ref()))
                .collect(),
            max_bytes,
        }
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(&limits.allowed_image_types, limits.max_file_size)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    pub fn validate(&self, upload: &UploadedImage) -> Result<(), ScoreError> {
        let declared = content_type_essence(&upload.content_type);
        if !self.allowed_types.iter().any(|t| *t == declared) {
            let shown = if declared.is_empty() { "unknown" } else { declared.as_str() };
            return Err(ScoreError::validation(format!(
                "Invalid file type '{shown}'. Allowed types: {}",
                self.allowed_types.join(", ")
            )));
        }
        if upload.is_empty() {
            return Err(ScoreError::validation("Uploaded file is empty"));
        }
        if upload.len() > self.max_bytes {
            return Err(ScoreError::validation(format!(
                "File too large ({}). Maximum size: {}",
                megabytes(upload.len()),
                megabytes(self.max_bytes)
            )));
        }
        Ok(())
    }
}

fn megabytes(bytes: usize) -> String {
    format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
}

/// A normalized JPEG with its final pixel dimensions.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl NormalizedImage {
    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn to_image_part(&self) -> ImagePart {
        ImagePart {
            mime_type: self.mime_type().to_string(),
            base64: self.to_base64(),
        }
    }
}

/// Validates and re-encodes uploads. CPU bound; async callers should run
/// [`ImageNormalizer::normalize`] on the blocking pool.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    policy: UploadPolicy,
    max_dimension: u32,
}

impl ImageNormalizer {
    pub fn new(policy: UploadPolicy, max_dimension: u32) -> Self {
        Self {
            policy,
            max_dimension: max_dimension.max(1),
        }
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(UploadPolicy::from_limits(limits), limits.max_image_dimension)
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn normalize(&self, upload: &UploadedImage) -> Result<NormalizedImage, ScoreError> {
        self.policy.validate(upload)?;

        let decoded = image::load_from_memory(&upload.data)
            .map_err(|e| ScoreError::validation(format!("Error processing image: {e}")))?;
        let (orig_w, orig_h) = (decoded.width(), decoded.height());

        let rgb = fit_within(into_rgb8(decoded), self.max_dimension);
        let (width, height) = rgb.dimensions();

        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, DEFAULT_JPEG_QUALITY)
            .encode_image(&rgb)
            .map_err(|e| ScoreError::validation(format!("Error processing image: {e}")))?;

        debug!(
            orig_w,
            orig_h,
            width,
            height,
            bytes = encoded.len(),
            "Normalized card image"
        );

        Ok(NormalizedImage {
            width,
            height,
            data: Bytes::from(encoded),
        })
    }

    /// Runs [`normalize`](Self::normalize) on tokio's blocking pool.
    pub async fn normalize_blocking(
        &self,
        upload: UploadedImage,
    ) -> Result<NormalizedImage, ScoreError> {
        let normalizer = self.clone();
        tokio::task::spawn_blocking(move || normalizer.normalize(&upload))
            .await
            .map_err(|e| ScoreError::Other(e.into()))?
    }
}

fn into_rgb8(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Shrinks so the longer side equals `bound`, keeping aspect ratio.
fn fit_within(image: RgbImage, bound: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if w <= bound && h <= bound {
        return image;
    }
    let scale = f64::from(bound) / f64::from(w.max(h));
    let new_w = ((f64::from(w) * scale).round() as u32).clamp(1, bound);
    let new_h = ((f64::from(h) * scale).round() as u32).clamp(1, bound);
    image::imageops::resize(&image, new_w, new_h, FilterType::Lanczos3)
}
