//! Single-card critique: one prompt, one image, one decoded `CritiqueResult`.

use std::sync::Arc;

use psychoscore_core::{CritiqueResult, ImagePart, ScoreError, VisionBackend, VisionRequest};
use tracing::{info, warn};

use crate::json_extract::{extract_json, ExtractError};
use crate::prompts::CRITIQUE_PROMPT;

#[derive(Clone)]
pub struct CritiqueRequester {
    backend: Arc<dyn VisionBackend>,
}

impl CritiqueRequester {
    pub fn new(backend: Arc<dyn VisionBackend>) -> Self {
        Self { backend }
    }

    /// Backend failures propagate; an undecodable reply becomes the fallback.
    pub async fn critique(&self, image: &ImagePart) -> Result<CritiqueResult, ScoreError> {
        let request = VisionRequest::new().text(CRITIQUE_PROMPT).image(image.clone());
        let raw = self.backend.generate(&request).await?;
        let result = parse_critique(&raw);
        info!(
            provider = self.backend.name(),
            psycho_score = result.psycho_score.value(),
            "Critique ready"
        );
        Ok(result)
    }
}

/// Decodes a model reply, substituting [`CritiqueResult::fallback`] when the
/// reply holds no object matching the schema (including out-of-range scores).
pub fn parse_critique(raw: &str) -> CritiqueResult {
    match extract_json::<CritiqueResult>(raw) {
        Ok(result) => result,
        Err(ExtractError::NoObject) => {
            warn!(chars = raw.len(), "No JSON object in critique reply, using fallback");
            CritiqueResult::fallback(raw)
        }
        Err(e) => {
            warn!(error = %e, "Critique reply did not match schema, using fallback");
            CritiqueResult::fallback(raw)
        }
    }
}
