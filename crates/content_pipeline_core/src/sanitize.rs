//! crates/content_pipeline_core/src/sanitize.rs
//!
//! Cleans raw model output before it is handed to `serde_json`.
//!
//! Models routinely wrap JSON in markdown fences and leak raw newlines or tabs into
//! string values, both of which break strict parsing. This step removes the fences and
//! flattens every control character and whitespace run into a single space.

use regex::Regex;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[A-Za-z]*").expect("fence pattern is valid"))
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Strips code fences, replaces control characters with spaces, collapses
/// whitespace runs and trims the result.
pub fn sanitize_model_json(raw: &str) -> String {
    let without_fences = fence_regex().replace_all(raw, " ");
    let without_controls: String = without_fences
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    whitespace_regex()
        .replace_all(&without_controls, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        let raw = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(sanitize_model_json(raw), "[{\"a\": 1}]");
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(sanitize_model_json("```\n{}\n```"), "{}");
    }

    #[test]
    fn newlines_inside_strings_become_spaces() {
        let raw = "[{\"question\": \"line one\nline two\"}]";
        let cleaned = sanitize_model_json(raw);
        assert_eq!(cleaned, "[{\"question\": \"line one line two\"}]");
        assert!(serde_json::from_str::<serde_json::Value>(&cleaned).is_ok());
    }

    #[test]
    fn tabs_and_carriage_returns_are_flattened() {
        let raw = "\r\n\t[ 1,\t\t2 ]\r\n";
        assert_eq!(sanitize_model_json(raw), "[ 1, 2 ]");
    }

    #[test]
    fn other_control_characters_are_removed() {
        let raw = "[\"a\u{0007}b\"]";
        assert_eq!(sanitize_model_json(raw), "[\"a b\"]");
    }

    #[test]
    fn already_clean_text_is_unchanged() {
        let raw = "{\"score\": 80}";
        assert_eq!(sanitize_model_json(raw), raw);
    }
}
