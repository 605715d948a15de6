//! Card analysis endpoints under `/api/analyze`.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::ApiError;
use crate::pipeline::{AnalysisResponse, BattleResponse};
use crate::server::GatewayState;
use crate::upload::MultipartForm;

/// `POST /api/analyze/business-card`: critique plus optional audio.
pub async fn business_card(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut form = MultipartForm::read(multipart, &["file"]).await?;
    let include_audio = form.flag("include_audio", true)?;
    let voice_id = form.text("voice_id").map(str::to_string);
    let upload = form.take_file("file")?;

    let response = state
        .pipeline
        .analyze(upload, include_audio, voice_id.as_deref())
        .await?;
    Ok(Json(response))
}

/// `POST /api/analyze/psycho-score`: business-card with audio always requested.
pub async fn psycho_score(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut form = MultipartForm::read(multipart, &["file"]).await?;
    let upload = form.take_file("file")?;
    Ok(Json(state.pipeline.analyze(upload, true, None).await?))
}

/// `POST /api/analyze/image-only` and `/quick-analysis`: critique, no audio.
pub async fn image_only(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut form = MultipartForm::read(multipart, &["file"]).await?;
    let upload = form.take_file("file")?;
    Ok(Json(state.pipeline.analyze(upload, false, None).await?))
}

/// `POST /api/analyze/alpha-vs-beta`: two cards, one verdict.
pub async fn alpha_vs_beta(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<BattleResponse>, ApiError> {
    let mut form = MultipartForm::read(multipart, &["original", "contender"]).await?;
    let original = form.take_file("original")?;
    let contender = form.take_file("contender")?;
    Ok(Json(state.pipeline.battle(original, contender).await?))
}
