use std::sync::Mutex;

use async_trait::async_trait;
use psychoscore_core::{ImagePart, ScoreError, VisionBackend, VisionRequest};

/// Backend that replays a fixed reply and records what it was asked.
pub struct ScriptedVision {
    reply: Result<String, (u16, String)>,
    pub seen: Mutex<Vec<VisionRequest>>,
}

impl ScriptedVision {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: Err((status, message.into())),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VisionBackend for ScriptedVision {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &VisionRequest) -> Result<String, ScoreError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(ScoreError::upstream("scripted", *status, message.clone())),
        }
    }
}

pub fn card_image() -> ImagePart {
    ImagePart {
        mime_type: "image/jpeg".into(),
        base64: "/9j/4AAQ".into(),
    }
}
