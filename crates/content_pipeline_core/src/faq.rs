//! crates/content_pipeline_core/src/faq.rs
//!
//! Parsing of generated FAQ lists.

use crate::domain::Faq;
use crate::sanitize::sanitize_model_json;
use serde::Deserialize;

#[derive(Deserialize)]
struct RawFaq {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

/// Parses a JSON array of `{question, answer}` pairs, dropping blank entries.
pub fn parse_faqs(raw: &str) -> Result<Vec<Faq>, serde_json::Error> {
    let cleaned = sanitize_model_json(raw);
    let entries: Vec<RawFaq> = serde_json::from_str(&cleaned)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            let question = entry.question.trim();
            let answer = entry.answer.trim();
            (!question.is_empty() && !answer.is_empty()).then(|| Faq {
                question: question.to_string(),
                answer: answer.to_string(),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_pairs() {
        let raw = "```json\n[{\"question\": \" What is GDP? \", \"answer\": \"Total output.\"}, {\"question\": \"\", \"answer\": \"orphan\"}]\n```";
        let faqs = parse_faqs(raw).unwrap();
        assert_eq!(faqs, vec![Faq { question: "What is GDP?".into(), answer: "Total output.".into() }]);
    }

    #[test]
    fn non_array_output_is_an_error() {
        assert!(parse_faqs(r#"{"question": "q", "answer": "a"}"#).is_err());
    }
}
