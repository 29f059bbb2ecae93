//! JSON payload extraction from free-form model output
//!
//! Models asked for "a single JSON value" still wrap it in prose or markdown
//! fences often enough that a strict `serde_json::from_str` fails. The
//! heuristics here run in a fixed order and stop at the first candidate that
//! parses:
//!
//! 1. the raw text
//! 2. the text with a surrounding markdown fence removed
//! 3. the slice between the first `{` and the last `}`
//! 4. the slice between the first `[` and the last `]`

use serde_json::Value;

/// Which heuristic produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Raw,
    Fenced,
    BraceSlice,
    BracketSlice,
}

/// Parse a JSON payload out of model output.
///
/// Returns `None` when no heuristic yields valid JSON; the caller treats
/// that as a malformed response.
///
/// # Example
///
/// ```
/// use quorum_infrastructure::providers::extract::extract_json;
/// use serde_json::json;
///
/// let (value, _) = extract_json("Sure! ```json\n{\"ok\": true}\n```").unwrap();
/// assert_eq!(value, json!({"ok": true}));
/// ```
pub fn extract_json(text: &str) -> Option<(Value, Extraction)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some((value, Extraction::Raw));
    }

    if let Some(inner) = strip_markdown_fence(trimmed)
        && let Ok(value) = serde_json::from_str(inner)
    {
        return Some((value, Extraction::Fenced));
    }

    if let Some(slice) = delimited_slice(trimmed, '{', '}')
        && let Ok(value) = serde_json::from_str(slice)
    {
        return Some((value, Extraction::BraceSlice));
    }

    if let Some(slice) = delimited_slice(trimmed, '[', ']')
        && let Ok(value) = serde_json::from_str(slice)
    {
        return Some((value, Extraction::BracketSlice));
    }

    None
}

/// Contents of the first fenced block, with an optional language tag dropped.
fn strip_markdown_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn delimited_slice(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_json() {
        let (value, how) = extract_json("  {\"a\": 1}\n").unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(how, Extraction::Raw);
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let text = "Here you go:\n```json\n{\"verdict\": \"ok\"}\n```\nAnything else?";
        let (value, how) = extract_json(text).unwrap();
        assert_eq!(value, json!({"verdict": "ok"}));
        assert_eq!(how, Extraction::Fenced);
    }

    #[test]
    fn test_fence_without_tag() {
        let (value, how) = extract_json("```\n[1, 2]\n```").unwrap();
        assert_eq!(value, json!([1, 2]));
        assert_eq!(how, Extraction::Fenced);
    }

    #[test]
    fn test_brace_slice_in_prose() {
        let text = "The answer is {\"n\": {\"deep\": [1]}} as requested.";
        let (value, how) = extract_json(text).unwrap();
        assert_eq!(value, json!({"n": {"deep": [1]}}));
        assert_eq!(how, Extraction::BraceSlice);
    }

    #[test]
    fn test_bracket_slice_when_braces_fail() {
        let text = "items: [\"a\", \"b\"] (stray { and })";
        let (value, how) = extract_json(text).unwrap();
        assert_eq!(value, json!(["a", "b"]));
        assert_eq!(how, Extraction::BracketSlice);
    }

    #[test]
    fn test_scalar_raw_text_is_json() {
        let (value, _) = extract_json("42").unwrap();
        assert_eq!(value, json!(42));
    }

    #[test]
    fn test_unparseable() {
        assert!(extract_json("I cannot answer that.").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("} backwards {").is_none());
    }
}
