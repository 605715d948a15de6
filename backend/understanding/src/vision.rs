/// Vision understanding via Google Gemini `generateContent`.
///
/// Text and inline image parts are sent in the order they appear in the
/// [`VisionRequest`]; the reply text is returned untouched for the requesters
/// to decode.
use std::time::Duration;

use async_trait::async_trait;
use psychoscore_config::GeminiConfig;
use psychoscore_core::{ScoreError, VisionBackend, VisionPart, VisionRequest};
use psychoscore_logging::redact_sensitive_data;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const PROVIDER: &str = "gemini";

pub struct GeminiVision {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiVision {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ScoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoreError::Config(format!("failed to build Gemini HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &GeminiConfig) -> Result<Self, ScoreError> {
        Self::new(
            config.api_key.clone(),
            &config.model,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body(request: &VisionRequest) -> Value {
        let parts: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                VisionPart::Text(text) => json!({ "text": text }),
                VisionPart::Image(image) => json!({
                    "inlineData": { "mimeType": image.mime_type, "data": image.base64 }
                }),
            })
            .collect();
        json!({ "contents": [{ "parts": parts }] })
    }

    fn send_error(e: reqwest::Error) -> ScoreError {
        if e.is_timeout() {
            ScoreError::Timeout {
                provider: PROVIDER.to_string(),
            }
        } else {
            ScoreError::Transport {
                provider: PROVIDER.to_string(),
                message: redact_sensitive_data(&e.without_url().to_string()),
            }
        }
    }
}

/// Concatenated text of the first candidate. Empty when the model returned no
/// text (e.g. a safety block), which the requesters treat as undecodable.
fn reply_text(body: &Value) -> String {
    body["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl VisionBackend for GeminiVision {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(&self, request: &VisionRequest) -> Result<String, ScoreError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ScoreError::Config("GEMINI_API_KEY is not configured".to_string()))?;

        info!(
            model = %self.model,
            images = request.image_count(),
            "[Vision] Requesting critique from Gemini"
        );
        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(Self::send_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(provider = PROVIDER, status = status.as_u16(), "Gemini returned an error");
            return Err(ScoreError::upstream(
                PROVIDER,
                status.as_u16(),
                redact_sensitive_data(&body),
            ));
        }

        let body: Value = resp.json().await.map_err(|e| {
            if e.is_decode() {
                ScoreError::upstream(
                    PROVIDER,
                    status.as_u16(),
                    format!("Malformed response body: {}", e.without_url()),
                )
            } else {
                Self::send_error(e)
            }
        })?;
        let text = reply_text(&body);
        if text.is_empty() {
            warn!(provider = PROVIDER, "Gemini reply carried no text");
        }
        debug!(chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}
