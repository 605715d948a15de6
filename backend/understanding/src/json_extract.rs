//! Pulls a typed JSON object out of free-form model output.
//!
//! Models wrap JSON in prose, markdown fences, or both. Rather than slicing on
//! fence markers, each `{` is tried as a start position and scanned forward
//! with brace counting that understands string literals and escapes. Balanced
//! spans are decoded in order and the first one that fits the target type wins,
//! so a stray `{}` in the preamble never shadows the real answer.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Start positions tried before giving up. Keeps the scan linear in the reply
/// length even when the reply is mostly unclosed braces.
pub const MAX_CANDIDATE_STARTS: usize = 64;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object in reply")]
    NoObject,
    #[error("no JSON object matched the expected shape: {0}")]
    Mismatch(#[source] serde_json::Error),
}

/// Balanced `{...}` spans in `text`, in start order.
pub fn object_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|&(_, c)| c == '{')
        .take(MAX_CANDIDATE_STARTS)
        .filter_map(move |(start, _)| {
            balanced_end(&text[start..]).map(|end| &text[start..start + end])
        })
}

/// First candidate span that decodes as `T`. When spans exist but none fit,
/// the error from the first span is returned.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let mut first_error = None;
    for span in object_candidates(text) {
        match serde_json::from_str::<T>(span) {
            Ok(value) => return Ok(value),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.map_or(ExtractError::NoObject, ExtractError::Mismatch))
}

/// Byte length of the balanced `{...}` span at the start of `s`.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Scored {
        psycho_score: f64,
    }

    #[test]
    fn bare_object() {
        assert_eq!(extract_json::<Value>(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn fenced_object_with_surrounding_prose() {
        let reply = "Here is my verdict:\n```json\n{\"psycho_score\": 8.5, \"card_quality\": \"Bone\"}\n```\nImpressive.";
        assert_eq!(
            extract_json::<Value>(reply).unwrap(),
            json!({"psycho_score": 8.5, "card_quality": "Bone"})
        );
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let reply = r#"{"patrick_critique": "the } and { are \"tasteful\"", "n": {"x": 2}} trailing"#;
        let value: Value = extract_json(reply).unwrap();
        assert_eq!(value["patrick_critique"], "the } and { are \"tasteful\"");
        assert_eq!(value["n"]["x"], 2);
    }

    #[test]
    fn skips_non_json_braces_before_the_object() {
        let reply = "Scores {roughly} follow: {\"psycho_score\": 7}";
        assert_eq!(extract_json::<Scored>(reply).unwrap(), Scored { psycho_score: 7.0 });
    }

    #[test]
    fn objects_of_the_wrong_shape_are_skipped() {
        let reply = "Using the format {} you gave, plus {\"note\": \"x\"}:\n```json\n{\"psycho_score\": 9.0}\n```";
        assert_eq!(extract_json::<Scored>(reply).unwrap(), Scored { psycho_score: 9.0 });
    }

    #[test]
    fn mismatch_is_reported_separately_from_absence() {
        assert!(matches!(
            extract_json::<Scored>(r#"{"other": 1}"#),
            Err(ExtractError::Mismatch(_))
        ));
        assert!(matches!(extract_json::<Scored>("no json here"), Err(ExtractError::NoObject)));
    }

    #[test]
    fn unbalanced_or_missing_object_yields_no_object() {
        assert!(matches!(extract_json::<Value>("{\"a\": 1"), Err(ExtractError::NoObject)));
        assert!(matches!(extract_json::<Value>(""), Err(ExtractError::NoObject)));
    }

    #[test]
    fn multibyte_text_before_object() {
        let reply = "Très élégant — {\"ok\": true}";
        assert_eq!(extract_json::<Value>(reply).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn start_positions_are_capped() {
        let flood = "{".repeat(200_000);
        assert_eq!(object_candidates(&flood).count(), 0);

        let late = format!("{}{{\"psycho_score\": 1}}", "{ ".repeat(MAX_CANDIDATE_STARTS));
        assert!(matches!(extract_json::<Scored>(&late), Err(ExtractError::NoObject)));
    }
}
