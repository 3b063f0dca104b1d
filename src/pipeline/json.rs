//! JSON extraction from free-text LLM responses.
//!
//! Models asked to "output JSON only" still wrap it in prose or fences
//! often enough that the chart stage cannot parse responses directly.

/// Extracts the outermost `{...}` substring from a model response.
///
/// Greedy: spans from the first `{` to the last `}`. Returns `None` when
/// no such span exists; never errors. Whether the span is valid JSON is
/// the caller's problem.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_bare_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extracts_object_with_surrounding_prose() {
        let text = "Sure, here you go:\n{\"chart_type\": \"bar\"}\nHope that helps!";
        assert_eq!(extract_json_object(text), Some("{\"chart_type\": \"bar\"}"));
    }

    #[test]
    fn test_greedy_spans_nested_objects() {
        let text = r#"{"outer": {"inner": 1}} trailing {"another": 2}"#;
        // First `{` to last `}` — the span covers everything between.
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"outer": {"inner": 1}} trailing {"another": 2}"#)
        );
    }

    #[test]
    fn test_no_object_returns_none() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_unbalanced_braces_still_return_span() {
        // Extraction is a heuristic; JSON validation happens downstream.
        assert_eq!(extract_json_object("{oops"), None);
        assert_eq!(extract_json_object("}{"), None);
        assert_eq!(extract_json_object("} {a} {"), Some("{a}"));
    }

    #[test]
    fn test_multiline_object() {
        let text = "```json\n{\n  \"chart_type\": \"pie\"\n}\n```";
        let extracted = extract_json_object(text).unwrap();
        assert!(extracted.starts_with('{'));
        assert!(extracted.ends_with('}'));
        assert!(extracted.contains("pie"));
    }
}
