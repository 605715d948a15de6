/// ElevenLabs speech synthesis and voice catalogue.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use psychoscore_config::ElevenLabsConfig;
use psychoscore_core::{ScoreError, SpeechBackend};
use psychoscore_logging::redact_sensitive_data;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{info, warn};

const PROVIDER: &str = "elevenlabs";

/// Fixed delivery settings for the Bateman voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

#[derive(Serialize)]
struct ElevenLabsBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

pub struct ElevenLabsTts {
    api_key: Option<String>,
    base_url: String,
    model_id: String,
    settings: VoiceSettings,
    client: Client,
}

impl ElevenLabsTts {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ScoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoreError::Config(format!("failed to build ElevenLabs HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model_id: model_id.into(),
            settings: VoiceSettings::default(),
            client,
        })
    }

    pub fn from_config(config: &ElevenLabsConfig) -> Result<Self, ScoreError> {
        Self::new(
            config.api_key.clone(),
            &config.base_url,
            &config.model_id,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ScoreError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ScoreError::Config("ELEVENLABS_API_KEY is not configured".to_string()))?;
        Ok(builder.header("xi-api-key", key))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ScoreError> {
        let resp = builder.send().await.map_err(send_error)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        warn!(provider = PROVIDER, status = status.as_u16(), "ElevenLabs returned an error");
        Err(ScoreError::upstream(
            PROVIDER,
            status.as_u16(),
            redact_sensitive_data(&body),
        ))
    }
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

#[async_trait]
impl SpeechBackend for ElevenLabsTts {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ScoreError> {
        let url = format!("{}/text-to-speech/{}", self.base_url, voice_id);
        let body = ElevenLabsBody {
            text,
            model_id: &self.model_id,
            voice_settings: self.settings,
        };
        info!(voice_id, chars = text.chars().count(), "[TTS/ElevenLabs] Synthesizing");
        let builder = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body);
        let resp = self.send(self.authorized(builder)?).await?;
        resp.bytes().await.map_err(send_error)
    }

    async fn list_voices(&self) -> Result<serde_json::Value, ScoreError> {
        let url = format!("{}/voices", self.base_url);
        let builder = self.authorized(self.client.get(&url))?;
        let resp = self.send(builder).await?;
        let status = resp.status().as_u16();
        resp.json().await.map_err(|e| {
            if e.is_decode() {
                ScoreError::upstream(
                    PROVIDER,
                    status,
                    format!("Malformed response body: {}", e.without_url()),
                )
            } else {
                send_error(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tts(base: &str) -> ElevenLabsTts {
        ElevenLabsTts::new(
            Some("xi-test".into()),
            base,
            "eleven_monolingual_v1",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_fixed_voice_settings_and_returns_audio() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/text-to-speech/pNInz6obpgDQGcFmaJgB"))
            .and(header("xi-api-key", "xi-test"))
            .and(header("accept", "audio/mpeg"))
            .and(body_json(json!({
                "text": "hello",
                "model_id": "eleven_monolingual_v1",
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.5,
                    "style": 0.0,
                    "use_speaker_boost": true
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let audio = tts(&server.uri())
            .synthesize("hello", "pNInz6obpgDQGcFmaJgB")
            .await
            .unwrap();
        assert_eq!(&audio[..], b"ID3audio");
    }

    #[tokio::test]
    async fn error_body_is_carried_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("voice model offline"))
            .mount(&server)
            .await;

        let err = tts(&server.uri()).synthesize("hello", "v").await.unwrap_err();
        match err {
            ScoreError::Upstream { provider, status, message } => {
                assert_eq!(provider, "elevenlabs");
                assert_eq!(status, 500);
                assert_eq!(message, "voice model offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_voices_as_returned() {
        let server = MockServer::start().await;
        let catalogue = json!({ "voices": [{ "voice_id": "pNInz6obpgDQGcFmaJgB", "name": "Adam" }] });
        Mock::given(method("GET"))
            .and(path("/voices"))
            .and(header("xi-api-key", "xi-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalogue.clone()))
            .mount(&server)
            .await;

        assert_eq!(tts(&server.uri()).list_voices().await.unwrap(), catalogue);
    }

    #[tokio::test]
    async fn non_json_voice_catalogue_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = tts(&server.uri()).list_voices().await.unwrap_err();
        assert!(matches!(err, ScoreError::Upstream { status: 200, .. }));
    }

    #[tokio::test]
    async fn missing_key_is_config_error() {
        let engine = ElevenLabsTts::new(None, "http://127.0.0.1:9", "m", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            engine.synthesize("hi", "v").await.unwrap_err(),
            ScoreError::Config(_)
        ));
    }
}
