pub mod error;
pub mod traits;
pub mod types;

pub use error::ScoreError;
pub use traits::{ImagePart, SpeechBackend, VisionBackend, VisionPart, VisionRequest};
pub use types::{
    AudioArtifact, CardAssessment, CategoryBlock, ComparisonResult, CritiqueResult, Score,
    Verdict, Winner,
};
