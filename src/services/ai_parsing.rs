//! Best-effort extraction of JSON payloads from free-form model output.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiParseError {
    #[error("model returned an empty response")]
    Empty,
    #[error("model response is not the expected JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
}

impl AiParseError {
    /// The model text that failed to parse, if there was any.
    pub fn raw_text(&self) -> &str {
        match self {
            AiParseError::Empty => "",
            AiParseError::Json { raw, .. } => raw,
        }
    }
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:[A-Za-z]+)?\s*(.*?)(?:```|$)").unwrap_or_else(|e| {
            panic!("invalid fence pattern: {}", e);
        })
    })
}

/// Returns the part of `text` that should hold the JSON document: the body of the
/// first fenced block if there is one, otherwise the trimmed text.
pub fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(body) = fence_pattern()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
    {
        return body.as_str().trim();
    }

    trimmed
}

/// Parses model output into `T`. Falls back to the outermost `{...}` span when
/// the model wrapped its JSON in prose.
pub fn parse_ai_json<T: DeserializeOwned>(text: &str) -> Result<T, AiParseError> {
    // A bare document may itself contain backticks inside string values.
    if let Ok(value) = serde_json::from_str::<T>(text.trim()) {
        return Ok(value);
    }

    let payload = extract_json_payload(text);
    if payload.is_empty() {
        return Err(AiParseError::Empty);
    }

    match serde_json::from_str::<T>(payload) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            if let (Some(start), Some(end)) = (payload.find('{'), payload.rfind('}')) {
                if start < end && (start > 0 || end + 1 < payload.len()) {
                    if let Ok(value) = serde_json::from_str::<T>(&payload[start..=end]) {
                        return Ok(value);
                    }
                }
            }

            Err(AiParseError::Json {
                source: first_err,
                raw: text.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        minutes: u32,
    }

    #[test]
    fn test_plain_json() {
        let parsed: Sample = parse_ai_json(r#"  {"name": "a", "minutes": 3}  "#).unwrap();
        assert_eq!(parsed, Sample { name: "a".into(), minutes: 3 });
    }

    #[test]
    fn test_json_fence() {
        let text = "```json\n{\"name\": \"b\", \"minutes\": 4}\n```";
        assert_eq!(extract_json_payload(text), "{\"name\": \"b\", \"minutes\": 4}");
        let parsed: Sample = parse_ai_json(text).unwrap();
        assert_eq!(parsed.minutes, 4);
    }

    #[test]
    fn test_bare_fence_with_surrounding_prose() {
        let text = "Here you go:\n```\n{\"name\": \"c\", \"minutes\": 5}\n```\nEnjoy!";
        let parsed: Sample = parse_ai_json(text).unwrap();
        assert_eq!(parsed.name, "c");
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n{\"name\": \"d\", \"minutes\": 6}";
        let parsed: Sample = parse_ai_json(text).unwrap();
        assert_eq!(parsed.minutes, 6);
    }

    #[test]
    fn test_unfenced_json_with_fence_in_string_value() {
        let text = r#"{"name": "use ```code``` blocks", "minutes": 8}"#;
        let parsed: Sample = parse_ai_json(text).unwrap();
        assert_eq!(parsed.name, "use ```code``` blocks");
        assert_eq!(parsed.minutes, 8);
    }

    #[test]
    fn test_prose_wrapped_object() {
        let text = "Sure! {\"name\": \"e\", \"minutes\": 7} Hope that helps.";
        let parsed: Sample = parse_ai_json(text).unwrap();
        assert_eq!(parsed.name, "e");
    }

    #[test]
    fn test_missing_field_is_an_error_with_raw_text() {
        let err = parse_ai_json::<Sample>("{\"name\": \"f\"}").unwrap_err();
        assert!(matches!(err, AiParseError::Json { .. }));
        assert_eq!(err.raw_text(), "{\"name\": \"f\"}");
    }

    #[test]
    fn test_empty_response() {
        assert!(matches!(
            parse_ai_json::<Sample>("   "),
            Err(AiParseError::Empty)
        ));
        assert!(matches!(
            parse_ai_json::<Sample>("```json\n```"),
            Err(AiParseError::Empty)
        ));
    }
}
