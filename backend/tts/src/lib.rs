pub mod engine;
pub mod speech;

pub use engine::{ElevenLabsTts, VoiceSettings};
pub use speech::{with_signature_flair, SpeechRequester};
