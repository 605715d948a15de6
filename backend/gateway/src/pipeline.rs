//! Request orchestration: validate → normalize → critique/compare → speech.
//!
//! Steps run sequentially within a request. Speech is best-effort in every
//! combined endpoint: a failure is logged and the response carries no audio.

use std::time::Instant;

use chrono::{DateTime, Utc};
use psychoscore_core::{
    AudioArtifact, ComparisonResult, CritiqueResult, ImagePart, ScoreError, Verdict, Winner,
};
use psychoscore_media::{extension_for_mime, FileStore, ImageNormalizer, UploadedImage};
use psychoscore_tts::SpeechRequester;
use psychoscore_understanding::{ComparisonRequester, CritiqueRequester};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub analysis: CritiqueResult,
    pub audio: Option<AudioArtifact>,
    pub created_at: DateTime<Utc>,
    /// Seconds.
    pub processing_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleResponse {
    pub id: String,
    pub verdict: Verdict,
    pub winner: Winner,
    pub announcement: String,
    pub comparison: ComparisonResult,
    pub audio: Option<AudioArtifact>,
    pub created_at: DateTime<Utc>,
    pub processing_time: f64,
}

pub struct AnalysisPipeline {
    normalizer: ImageNormalizer,
    critic: CritiqueRequester,
    comparer: ComparisonRequester,
    speech: SpeechRequester,
    /// Present only when uploads are kept on disk.
    upload_store: Option<FileStore>,
}

impl AnalysisPipeline {
    pub fn new(
        normalizer: ImageNormalizer,
        critic: CritiqueRequester,
        comparer: ComparisonRequester,
        speech: SpeechRequester,
        upload_store: Option<FileStore>,
    ) -> Self {
        Self {
            normalizer,
            critic,
            comparer,
            speech,
            upload_store,
        }
    }

    pub fn speech(&self) -> &SpeechRequester {
        &self.speech
    }

    /// Validates and normalizes one upload into a backend-ready image.
    async fn prepare(&self, upload: UploadedImage) -> Result<ImagePart, ScoreError> {
        self.normalizer.policy().validate(&upload)?;
        self.keep_copy(&upload).await;
        let normalized = self.normalizer.normalize_blocking(upload).await?;
        Ok(normalized.to_image_part())
    }

    async fn keep_copy(&self, upload: &UploadedImage) {
        let Some(store) = &self.upload_store else {
            return;
        };
        let ext = extension_for_mime(&upload.content_type);
        match store.persist_with_extension(&upload.data, ext).await {
            Ok(stored) => debug!(
                client_name = upload.file_name.as_deref().unwrap_or("-"),
                stored = %stored.name,
                "Kept a copy of the upload"
            ),
            Err(e) => warn!(
                client_name = upload.file_name.as_deref().unwrap_or("-"),
                error = %e,
                "Failed to keep a copy of the upload"
            ),
        }
    }

    async fn best_effort_audio(
        &self,
        id: &str,
        text: &str,
        voice_id: Option<&str>,
    ) -> Option<AudioArtifact> {
        match self.speech.speak(text, voice_id).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!(analysis_id = %id, error = %e, "Audio generation failed, responding without audio");
                None
            }
        }
    }

    pub async fn analyze(
        &self,
        upload: UploadedImage,
        include_audio: bool,
        voice_id: Option<&str>,
    ) -> Result<AnalysisResponse, ScoreError> {
        let started = Instant::now();
        let id = Uuid::new_v4().to_string();

        let image = self.prepare(upload).await?;
        let analysis = self.critic.critique(&image).await?;

        let audio = if include_audio {
            self.best_effort_audio(&id, &analysis.patrick_critique, voice_id)
                .await
        } else {
            None
        };

        let elapsed = started.elapsed();
        info!(
            analysis_id = %id,
            psycho_score = analysis.psycho_score.value(),
            has_audio = audio.is_some(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Analysis complete"
        );
        Ok(AnalysisResponse {
            id,
            analysis,
            audio,
            created_at: Utc::now(),
            processing_time: elapsed.as_secs_f64(),
        })
    }

    pub async fn battle(
        &self,
        original: UploadedImage,
        contender: UploadedImage,
    ) -> Result<BattleResponse, ScoreError> {
        let started = Instant::now();
        let id = Uuid::new_v4().to_string();

        let original = self.prepare(original).await?;
        let contender = self.prepare(contender).await?;
        let comparison = self.comparer.compare(&original, &contender).await?;

        let verdict = Verdict::from(comparison.winner);
        let announcement = verdict.announcement();
        let audio = self.best_effort_audio(&id, announcement, None).await;

        let elapsed = started.elapsed();
        info!(
            analysis_id = %id,
            verdict = ?verdict,
            has_audio = audio.is_some(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Battle complete"
        );
        Ok(BattleResponse {
            id,
            verdict,
            winner: comparison.winner,
            announcement: announcement.to_string(),
            comparison,
            audio,
            created_at: Utc::now(),
            processing_time: elapsed.as_secs_f64(),
        })
    }
}
