use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ScoreError;

/// An encoded image ready to be embedded in a backend request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePart {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix.
    pub base64: String,
}

/// One element of a multimodal prompt, in the order the model should read it.
#[derive(Debug, Clone, PartialEq)]
pub enum VisionPart {
    Text(String),
    Image(ImagePart),
}

/// Ordered text and image parts submitted in a single backend call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionRequest {
    pub parts: Vec<VisionPart>,
}

impl VisionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(VisionPart::Text(text.into()));
        self
    }

    pub fn image(mut self, image: ImagePart) -> Self {
        self.parts.push(VisionPart::Image(image));
        self
    }

    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, VisionPart::Image(_)))
            .count()
    }
}

/// A vision-language model that answers a multimodal prompt with free-form text.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Provider name used in logs and error messages (e.g. "gemini").
    fn name(&self) -> &str;

    /// Submit the request and return the model's raw text reply.
    async fn generate(&self, request: &VisionRequest) -> Result<String, ScoreError>;
}

/// A text-to-speech service.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Returns raw encoded audio bytes (MP3).
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ScoreError>;

    /// Voice catalogue exactly as the provider returns it.
    async fn list_voices(&self) -> Result<serde_json::Value, ScoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_keeps_part_order() {
        let img = ImagePart {
            mime_type: "image/jpeg".into(),
            base64: "AAAA".into(),
        };
        let req = VisionRequest::new()
            .text("prompt")
            .text("ORIGINAL CARD")
            .image(img.clone())
            .text("CONTENDER CARD")
            .image(img);
        assert_eq!(req.parts.len(), 5);
        assert_eq!(req.image_count(), 2);
        assert_eq!(req.parts[0], VisionPart::Text("prompt".into()));
    }
}
