//! Two-card comparison in a single backend call.

use std::sync::Arc;

use psychoscore_core::{ComparisonResult, ImagePart, ScoreError, VisionBackend, VisionRequest};
use tracing::{info, warn};

use crate::json_extract::{extract_json, ExtractError};
use crate::prompts::{COMPARISON_PROMPT, CONTENDER_LABEL, ORIGINAL_LABEL};

#[derive(Clone)]
pub struct ComparisonRequester {
    backend: Arc<dyn VisionBackend>,
}

impl ComparisonRequester {
    pub fn new(backend: Arc<dyn VisionBackend>) -> Self {
        Self { backend }
    }

    pub async fn compare(
        &self,
        original: &ImagePart,
        contender: &ImagePart,
    ) -> Result<ComparisonResult, ScoreError> {
        let request = VisionRequest::new()
            .text(COMPARISON_PROMPT)
            .text(ORIGINAL_LABEL)
            .image(original.clone())
            .text(CONTENDER_LABEL)
            .image(contender.clone());
        let raw = self.backend.generate(&request).await?;
        let result = parse_comparison(&raw);
        info!(
            provider = self.backend.name(),
            winner = ?result.winner,
            original_score = result.original_card.psycho_score.value(),
            contender_score = result.contender_card.psycho_score.value(),
            "Comparison ready"
        );
        Ok(result)
    }
}

/// Decodes a comparison reply. A winner other than `original`/`contender`,
/// a missing field or an out-of-range score all yield the fallback.
pub fn parse_comparison(raw: &str) -> ComparisonResult {
    match extract_json::<ComparisonResult>(raw) {
        Ok(result) => result,
        Err(ExtractError::NoObject) => {
            warn!(chars = raw.len(), "No JSON object in comparison reply, using fallback");
            ComparisonResult::fallback(raw)
        }
        Err(e) => {
            warn!(error = %e, "Comparison reply did not match schema, using fallback");
            ComparisonResult::fallback(raw)
        }
    }
}
