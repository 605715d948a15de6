use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ScoreError;

/// Maximum characters of a raw model reply carried into a fallback result.
pub const FALLBACK_EXCERPT_CHARS: usize = 500;

const FALLBACK_CRITIQUE: &str = "The subtlety of the design shows a certain... restraint. \
Though lacking the sophisticated edge I prefer in my own cards, it demonstrates a basic \
understanding of professional presentation.";

const FALLBACK_COMPARISON: &str = "Both cards show a certain... competence. Neither has the \
watermark, the tasteful thickness, the off-white coloring I demand. The original holds its \
ground by default.";

/// A 0-10 rating. Construction rejects anything outside the range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Score given to every fallback result.
    pub const NEUTRAL: Score = Score(6.5);

    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if value.is_nan() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ScoreError::validation(format!(
                "score {value} outside [{}, {}]",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Free-form category analysis (layout, typography, colour) as returned by the model.
pub type CategoryBlock = Map<String, Value>;

/// Themed critique of a single card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub card_quality: String,
    pub design_elements: CategoryBlock,
    pub typography: CategoryBlock,
    pub color_scheme: CategoryBlock,
    pub layout_quality: String,
    pub material_impression: String,
    pub patrick_critique: String,
    pub psycho_score: Score,
}

impl CritiqueResult {
    /// Always-valid substitute used when the model reply cannot be decoded.
    pub fn fallback(raw_reply: &str) -> Self {
        Self {
            card_quality: "Analysis completed with standard processing".to_string(),
            design_elements: block(&[
                ("layout", "Professional layout detected"),
                ("whitespace", "Adequate spacing"),
                ("composition", "Standard business card composition"),
            ]),
            typography: block(&[
                ("font_family", "Standard business fonts"),
                ("hierarchy", "Clear hierarchy"),
                ("readability", "Good readability"),
            ]),
            color_scheme: block(&[
                ("palette", "Professional color scheme"),
                ("contrast", "Adequate contrast"),
                ("sophistication", "Business appropriate"),
            ]),
            layout_quality: "Professional standard".to_string(),
            material_impression: "Standard business card stock".to_string(),
            patrick_critique: excerpt_or(raw_reply, FALLBACK_CRITIQUE),
            psycho_score: Score::NEUTRAL,
        }
    }
}

/// Per-card half of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAssessment {
    pub strengths: String,
    pub weaknesses: String,
    pub psycho_score: Score,
}

/// Which of the two uploaded cards won. No other value decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Original,
    Contender,
}

/// Head-to-head judgement of two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub original_card: CardAssessment,
    pub contender_card: CardAssessment,
    pub patrick_comparison: String,
    pub winner: Winner,
    pub winner_reasoning: String,
}

impl ComparisonResult {
    pub fn fallback(raw_reply: &str) -> Self {
        let neutral = CardAssessment {
            strengths: "Competent, professional presentation".to_string(),
            weaknesses: "Nothing that would make anyone reach for a sedative".to_string(),
            psycho_score: Score::NEUTRAL,
        };
        Self {
            original_card: neutral.clone(),
            contender_card: neutral,
            patrick_comparison: excerpt_or(raw_reply, FALLBACK_COMPARISON),
            winner: Winner::Original,
            winner_reasoning: "No decisive verdict could be read; the original card keeps its title."
                .to_string(),
        }
    }
}

/// Dramatized label for a comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Alpha,
    Beta,
}

impl From<Winner> for Verdict {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Original => Self::Alpha,
            Winner::Contender => Self::Beta,
        }
    }
}

impl Verdict {
    /// Text handed to speech synthesis when announcing the outcome.
    pub fn announcement(self) -> &'static str {
        match self {
            Self::Alpha => {
                "ALPHA. The original card is superior. Look at that subtle off-white coloring. \
                 The tasteful thickness of it. The contender never stood a chance."
            }
            Self::Beta => {
                "BETA. The contender's card is superior. The lettering, the watermark... \
                 impressive. Very nice. I think I have to return some videotapes."
            }
        }
    }
}

/// A synthesized audio file on disk, exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub audio_url: String,
    pub file_name: String,
    pub file_size: u64,
    /// Not computed; kept so clients can rely on the field existing.
    pub audio_duration: Option<f64>,
}

fn block(entries: &[(&str, &str)]) -> CategoryBlock {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn excerpt_or(raw: &str, canned: &str) -> String {
    if raw.trim().is_empty() {
        canned.to_string()
    } else {
        raw.chars().take(FALLBACK_EXCERPT_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn score_bounds_are_inclusive() {
        assert!(Score::new(0.0).is_ok());
        assert!(Score::new(10.0).is_ok());
        assert!(Score::new(-0.1).is_err());
        assert!(Score::new(10.01).is_err());
        assert!(Score::new(f64::NAN).is_err());
    }

    #[test]
    fn score_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_value::<Score>(json!(11)).is_err());
        let s: Score = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(s.value(), 7.0);
    }

    #[test]
    fn fallback_critique_truncates_to_500_chars() {
        let raw = "x".repeat(900);
        let result = CritiqueResult::fallback(&raw);
        assert_eq!(result.patrick_critique.chars().count(), 500);
        assert_eq!(result.psycho_score, Score::NEUTRAL);
    }

    #[test]
    fn fallback_critique_on_blank_reply_uses_canned_text() {
        let result = CritiqueResult::fallback("   ");
        assert!(result.patrick_critique.starts_with("The subtlety of the design"));
    }

    #[test]
    fn fallback_excerpt_counts_chars_not_bytes() {
        let raw = "é".repeat(600);
        let result = CritiqueResult::fallback(&raw);
        assert_eq!(result.patrick_critique.chars().count(), 500);
    }

    #[test]
    fn winner_rejects_unknown_value() {
        assert!(serde_json::from_value::<Winner>(json!("draw")).is_err());
        assert_eq!(
            serde_json::from_value::<Winner>(json!("contender")).unwrap(),
            Winner::Contender
        );
    }

    #[test]
    fn verdict_follows_winner() {
        assert_eq!(Verdict::from(Winner::Original), Verdict::Alpha);
        assert_eq!(Verdict::from(Winner::Contender), Verdict::Beta);
        assert!(Verdict::Beta.announcement().starts_with("BETA"));
        assert_eq!(serde_json::to_value(Verdict::Alpha).unwrap(), json!("ALPHA"));
    }

    #[test]
    fn comparison_fallback_scores_are_in_range() {
        let result = ComparisonResult::fallback("");
        for score in [result.original_card.psycho_score, result.contender_card.psycho_score] {
            assert!((Score::MIN..=Score::MAX).contains(&score.value()));
        }
        assert_eq!(result.winner, Winner::Original);
    }
}
