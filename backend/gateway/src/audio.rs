//! Speech endpoints under `/api/audio`.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use psychoscore_core::AudioArtifact;
use psychoscore_media::{content_type_essence, load_media_file, MediaFile};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::upload::MultipartForm;

/// `text` and optional `voice_id`, sent either urlencoded or as multipart.
#[derive(Debug, Default, Deserialize)]
pub struct SpeechForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[async_trait]
impl<S> FromRequest<S> for SpeechForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(content_type_essence)
            .unwrap_or_default();

        if content_type == "multipart/form-data" {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;
            let form = MultipartForm::read(multipart, &[]).await?;
            return Ok(Self {
                text: form.text("text").unwrap_or_default().to_string(),
                voice_id: form.text("voice_id").map(str::to_string),
            });
        }

        let Form(form) = Form::<SpeechForm>::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        Ok(form)
    }
}

/// `POST /api/audio/generate`
pub async fn generate(
    State(state): State<GatewayState>,
    form: SpeechForm,
) -> Result<Json<AudioArtifact>, ApiError> {
    let artifact = state
        .pipeline
        .speech()
        .speak(&form.text, form.voice_id.as_deref())
        .await?;
    Ok(Json(artifact))
}

/// `POST /api/audio/patrick-critique`: same as generate with the signature opener.
pub async fn patrick_critique(
    State(state): State<GatewayState>,
    form: SpeechForm,
) -> Result<Json<AudioArtifact>, ApiError> {
    let artifact = state.pipeline.speech().speak_in_character(&form.text).await?;
    Ok(Json(artifact))
}

/// `GET /api/audio/voices`
pub async fn voices(State(state): State<GatewayState>) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(state.pipeline.speech().list_voices().await?))
}

/// `GET /api/audio/file/:name`
pub async fn file(
    State(state): State<GatewayState>,
    Path(name): Path<String>,
) -> Result<MediaFile, ApiError> {
    Ok(load_media_file(state.pipeline.speech().store(), &name).await?)
}
