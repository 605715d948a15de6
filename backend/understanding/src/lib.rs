pub mod compare;
pub mod critique;
pub mod json_extract;
pub mod prompts;
pub mod vision;

pub use compare::{parse_comparison, ComparisonRequester};
pub use critique::{parse_critique, CritiqueRequester};
pub use json_extract::{extract_json, ExtractError};
pub use vision::GeminiVision;

#[cfg(test)]
pub(crate) mod testing;
