//! Lenient JSON extraction from model replies.
//!
//! Models wrap JSON in code fences or surround it with prose. These helpers
//! peel that off before handing the text to serde.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;

lazy_static! {
    // Outermost bracketed span, greedy across lines
    static ref ARRAY_REGEX: Regex = Regex::new(r"\[[\s\S]*\]").unwrap();
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = start + 3;
    let content_start = trimmed[after_fence..]
        .find('\n')
        .map(|i| after_fence + i + 1)
        .unwrap_or(after_fence);
    match trimmed[content_start..].find("```") {
        Some(end) => trimmed[content_start..content_start + end].trim(),
        None => trimmed[content_start..].trim(),
    }
}

/// First balanced `{...}` span, ignoring braces inside string literals.
pub fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
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
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a JSON object from a reply, tolerating fences and surrounding prose.
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let text = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if value.is_object() {
            return serde_json::from_value(value).ok();
        }
    }
    serde_json::from_str(first_balanced_object(text)?).ok()
}

/// Parse a JSON array from a reply.
///
/// Tries the fence-stripped text, then an object wrapping the array under
/// `key`, then the outermost `[...]` span.
pub fn parse_array<T: DeserializeOwned>(raw: &str, key: &str) -> Option<Vec<T>> {
    let text = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        let items = match value {
            serde_json::Value::Array(_) => Some(value),
            serde_json::Value::Object(mut obj) => obj.remove(key),
            _ => None,
        };
        if let Some(items) = items {
            return serde_json::from_value(items).ok();
        }
    }
    let span = ARRAY_REGEX.find(text)?;
    serde_json::from_str(span.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        a: i32,
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fences("Here:\n```json\n{}\n```\nThanks"), "{}");
    }

    #[test]
    fn test_first_balanced_object_skips_string_braces() {
        let text = r#"Sure! {"a": "}{", "b": {"c": 1}} and {"later": true}"#;
        assert_eq!(
            first_balanced_object(text),
            Some(r#"{"a": "}{", "b": {"c": 1}}"#)
        );
        assert_eq!(first_balanced_object("no json"), None);
        assert_eq!(first_balanced_object("{ unterminated"), None);
    }

    #[test]
    fn test_parse_object_with_prose() {
        let parsed: Pair = parse_object("The answer is {\"a\": 2}. Enjoy!").unwrap();
        assert_eq!(parsed, Pair { a: 2 });
        assert!(parse_object::<Pair>("nothing here").is_none());
        assert!(parse_object::<Pair>("[1, 2]").is_none());
    }

    #[test]
    fn test_parse_array_variants() {
        let plain: Vec<Pair> = parse_array("[{\"a\":1}]", "records").unwrap();
        assert_eq!(plain.len(), 1);

        let wrapped: Vec<Pair> = parse_array("{\"records\": [{\"a\":1},{\"a\":2}]}", "records").unwrap();
        assert_eq!(wrapped.len(), 2);

        let fenced: Vec<Pair> = parse_array("```json\n[{\"a\":3}]\n```", "records").unwrap();
        assert_eq!(fenced, vec![Pair { a: 3 }]);

        let prose: Vec<Pair> = parse_array("Here you go: [{\"a\":4}] hope it helps", "records").unwrap();
        assert_eq!(prose, vec![Pair { a: 4 }]);

        assert!(parse_array::<Pair>("no list", "records").is_none());
    }
}
