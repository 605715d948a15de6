//! Turns critique text into a stored MP3 and the artifact clients fetch it by.

use std::sync::Arc;

use psychoscore_core::{AudioArtifact, ScoreError, SpeechBackend};
use psychoscore_media::FileStore;
use tracing::info;

/// Route prefix under which stored audio is served.
pub const AUDIO_URL_PREFIX: &str = "/api/audio/file/";

const SIGNATURE_LINE: &str = "Look at that subtle off-white coloring... ";
const SIGNATURE_MARKERS: &[&str] = &["look at that", "subtle", "tasteful", "elegant"];

#[derive(Clone)]
pub struct SpeechRequester {
    backend: Arc<dyn SpeechBackend>,
    store: FileStore,
    default_voice_id: String,
    max_chars: usize,
}

impl SpeechRequester {
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        store: FileStore,
        default_voice_id: impl Into<String>,
        max_chars: usize,
    ) -> Self {
        Self {
            backend,
            store,
            default_voice_id: default_voice_id.into(),
            max_chars,
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Rejects blank text and text over the character limit.
    pub fn validate_text(&self, text: &str) -> Result<(), ScoreError> {
        if text.trim().is_empty() {
            return Err(ScoreError::validation("Text cannot be empty"));
        }
        let chars = text.chars().count();
        if chars > self.max_chars {
            return Err(ScoreError::validation(format!(
                "Text too long ({chars} characters). Maximum: {} characters",
                self.max_chars
            )));
        }
        Ok(())
    }

    fn voice<'a>(&'a self, voice_override: Option<&'a str>) -> &'a str {
        voice_override
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.default_voice_id.as_str())
    }

    pub async fn speak(
        &self,
        text: &str,
        voice_override: Option<&str>,
    ) -> Result<AudioArtifact, ScoreError> {
        self.validate_text(text)?;
        self.render(text, self.voice(voice_override)).await
    }

    /// Speaks `text` with the signature opener in the default voice. Only the
    /// caller's text counts against the limit; the opener rides on top.
    pub async fn speak_in_character(&self, text: &str) -> Result<AudioArtifact, ScoreError> {
        self.validate_text(text)?;
        self.render(&with_signature_flair(text), &self.default_voice_id)
            .await
    }

    async fn render(&self, text: &str, voice_id: &str) -> Result<AudioArtifact, ScoreError> {
        let audio = self.backend.synthesize(text, voice_id).await?;
        let stored = self.store.persist(&audio).await?;

        info!(
            provider = self.backend.name(),
            voice_id,
            file = %stored.name,
            size = stored.size,
            "Audio stored"
        );
        Ok(AudioArtifact {
            audio_url: format!("{AUDIO_URL_PREFIX}{}", stored.name),
            file_name: stored.name,
            file_size: stored.size,
            audio_duration: None,
        })
    }

    pub async fn list_voices(&self) -> Result<serde_json::Value, ScoreError> {
        self.backend.list_voices().await
    }
}

/// Opens with the signature line unless the text already sounds the part.
pub fn with_signature_flair(text: &str) -> String {
    let lower = text.to_lowercase();
    if SIGNATURE_MARKERS.iter().any(|m| lower.contains(m)) {
        text.to_string()
    } else {
        format!("{SIGNATURE_LINE}{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeSpeech {
        calls: AtomicUsize,
        voices: Mutex<Vec<String>>,
        fail_with: Option<u16>,
    }

    impl FakeSpeech {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                voices: Mutex::new(Vec::new()),
                fail_with: None,
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                voices: Mutex::new(Vec::new()),
                fail_with: Some(status),
            })
        }
    }

    #[async_trait]
    impl SpeechBackend for FakeSpeech {
        fn name(&self) -> &str {
            "fake"
        }

        async fn synthesize(&self, _text: &str, voice_id: &str) -> Result<Bytes, ScoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.voices.lock().unwrap().push(voice_id.to_string());
            match self.fail_with {
                Some(status) => Err(ScoreError::upstream("fake", status, "synthesis exploded")),
                None => Ok(Bytes::from_static(b"0123456789")),
            }
        }

        async fn list_voices(&self) -> Result<serde_json::Value, ScoreError> {
            Ok(serde_json::json!({ "voices": [] }))
        }
    }

    fn requester(backend: Arc<FakeSpeech>, dir: &std::path::Path) -> SpeechRequester {
        SpeechRequester::new(backend, FileStore::audio(dir), "pNInz6obpgDQGcFmaJgB", 5000)
    }

    #[tokio::test]
    async fn stores_exact_bytes_and_links_them() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FakeSpeech::ok();
        let artifact = requester(backend.clone(), tmp.path())
            .speak("hello", None)
            .await
            .unwrap();

        assert_eq!(artifact.file_size, 10);
        assert_eq!(artifact.audio_url, format!("/api/audio/file/{}", artifact.file_name));
        assert_eq!(artifact.audio_duration, None);
        let on_disk = std::fs::read(tmp.path().join(&artifact.file_name)).unwrap();
        assert_eq!(on_disk.len(), 10);
        assert_eq!(backend.voices.lock().unwrap()[0], "pNInz6obpgDQGcFmaJgB");
    }

    #[tokio::test]
    async fn length_limit_is_inclusive_and_checked_before_calling_out() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FakeSpeech::ok();
        let speech = requester(backend.clone(), tmp.path());

        let err = speech.speak(&"a".repeat(5001), None).await.unwrap_err();
        assert!(matches!(err, ScoreError::Validation(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

        speech.speak(&"a".repeat(5000), None).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FakeSpeech::ok();
        let err = requester(backend.clone(), tmp.path())
            .speak("   \n", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Text cannot be empty");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn voice_override_wins_unless_blank() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FakeSpeech::ok();
        let speech = requester(backend.clone(), tmp.path());

        speech.speak("hi", Some("custom")).await.unwrap();
        speech.speak("hi", Some("  ")).await.unwrap();
        let voices = backend.voices.lock().unwrap();
        assert_eq!(*voices, vec!["custom".to_string(), "pNInz6obpgDQGcFmaJgB".to_string()]);
    }

    #[tokio::test]
    async fn backend_failure_is_upstream_with_message() {
        let tmp = tempfile::tempdir().unwrap();
        let err = requester(FakeSpeech::failing(500), tmp.path())
            .speak("hello", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "fake API error (500): synthesis exploded");
        assert!(std::fs::read_dir(tmp.path()).map(|d| d.count()).unwrap_or(0) == 0);
    }

    #[tokio::test]
    async fn in_character_limit_counts_only_the_callers_text() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FakeSpeech::ok();
        let speech = requester(backend.clone(), tmp.path());

        speech.speak_in_character(&"a".repeat(4990)).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        let err = speech.speak_in_character(&"a".repeat(5001)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Text too long (5001 characters). Maximum: 5000 characters"
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn flair_is_added_once() {
        assert_eq!(
            with_signature_flair("Nice card."),
            "Look at that subtle off-white coloring... Nice card."
        );
        assert_eq!(with_signature_flair("How TASTEFUL."), "How TASTEFUL.");
    }
}
