//! crates/content_pipeline_core/src/validator.rs
//!
//! Turns raw model output into typed, invariant-respecting questions.
//!
//! Parsing is lenient per field (missing text becomes placeholder text, missing marks
//! become the type default) but strict per batch for multiple-choice shape: a single
//! malformed option list rejects the whole batch, which is then replaced by fallback
//! questions so callers never see a hard error for bad model output.

use crate::domain::{Difficulty, GeneratedQuestion, QuestionType};
use crate::sanitize::sanitize_model_json;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const MISSING_QUESTION: &str = "Question not available";
pub const MISSING_ANSWER: &str = "Answer not available";
pub const MISSING_EXPLANATION: &str = "Explanation not available";

const MCQ_OPTION_COUNT: usize = 4;

//=========================================================================================
// Validation Errors
//=========================================================================================

/// Why a batch of model output was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("model output is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("model output is not a JSON array")]
    NotAnArray,
    #[error("question {index} has {found} usable options, expected 4 distinct options")]
    McqOptions { index: usize, found: usize },
    #[error("question {index} has a correct answer that matches none of its options")]
    McqAnswerMismatch { index: usize },
}

//=========================================================================================
// Question Ids
//=========================================================================================

/// Produces `<timestamp>-<index>` ids for one generation run.
///
/// A multi-batch run shares one timestamp and advances `first_index` per batch,
/// so ids stay unique across the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSeed {
    pub timestamp_ms: i64,
    pub first_index: usize,
}

impl IdSeed {
    pub fn new(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            first_index: 0,
        }
    }

    /// Seeds from the current wall-clock time.
    pub fn now() -> Self {
        Self::new(chrono::Utc::now().timestamp_millis())
    }

    pub fn id(&self, index: usize) -> String {
        format!("{}-{}", self.timestamp_ms, self.first_index + index)
    }

    /// The seed for the ids that follow the first `consumed` ones.
    pub fn advanced(&self, consumed: usize) -> Self {
        Self {
            timestamp_ms: self.timestamp_ms,
            first_index: self.first_index + consumed,
        }
    }
}

//=========================================================================================
// Parsing
//=========================================================================================

/// Parses and validates raw model output without any recovery.
pub fn validate_questions(
    raw: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    ids: IdSeed,
) -> Result<Vec<GeneratedQuestion>, ValidationError> {
    let cleaned = sanitize_model_json(raw);
    let value: Value = serde_json::from_str(&cleaned)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ValidationError::NotAnArray),
    };

    let empty = Map::new();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let fields = item.as_object().unwrap_or(&empty);
            normalize_question(fields, index, question_type, difficulty, ids)
        })
        .collect()
}

/// Parses model output into exactly `expected` questions.
///
/// On a parse failure or shape violation the whole batch is replaced by `expected`
/// fallback questions. A valid batch with too many items is truncated and one with
/// too few is padded with fallback questions.
pub fn parse_questions(
    raw: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    expected: usize,
    ids: IdSeed,
) -> Vec<GeneratedQuestion> {
    match validate_questions(raw, question_type, difficulty, ids) {
        Ok(mut questions) => {
            if questions.len() > expected {
                debug!("Model returned {} questions, keeping {}", questions.len(), expected);
                questions.truncate(expected);
            } else if questions.len() < expected {
                warn!(
                    "Model returned {} of {} questions; padding with fallback questions",
                    questions.len(),
                    expected
                );
                let have = questions.len();
                questions.extend(fallback_questions(
                    question_type,
                    difficulty,
                    expected - have,
                    ids.advanced(have),
                ));
            }
            questions
        }
        Err(e) => {
            warn!("Discarding generated batch: {}", e);
            fallback_questions(question_type, difficulty, expected, ids)
        }
    }
}

fn normalize_question(
    fields: &Map<String, Value>,
    index: usize,
    question_type: QuestionType,
    difficulty: Difficulty,
    ids: IdSeed,
) -> Result<GeneratedQuestion, ValidationError> {
    let question = text_field(fields, "question").unwrap_or_else(|| MISSING_QUESTION.to_string());
    let correct_answer =
        text_field(fields, "correctAnswer").unwrap_or_else(|| MISSING_ANSWER.to_string());
    let explanation =
        text_field(fields, "explanation").unwrap_or_else(|| MISSING_EXPLANATION.to_string());
    let marks = marks_field(fields.get("marks")).unwrap_or_else(|| question_type.default_marks());
    let reasoning = text_field(fields, "reasoning");

    let options = if question_type == QuestionType::Mcq {
        let options = mcq_options(fields.get("options"), index)?;
        if !options.contains(&correct_answer) {
            return Err(ValidationError::McqAnswerMismatch { index });
        }
        Some(options)
    } else {
        None
    };

    Ok(GeneratedQuestion {
        id: ids.id(index),
        question,
        options,
        correct_answer,
        explanation,
        marks,
        question_type,
        difficulty,
        reasoning,
    })
}

fn mcq_options(value: Option<&Value>, index: usize) -> Result<Vec<String>, ValidationError> {
    let entries = match value {
        Some(Value::Array(entries)) => entries,
        _ => return Err(ValidationError::McqOptions { index, found: 0 }),
    };

    let mut options: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(option) = scalar_text(entry) else {
            return Err(ValidationError::McqOptions { index, found: options.len() });
        };
        if !options.contains(&option) {
            options.push(option);
        }
    }

    if entries.len() != MCQ_OPTION_COUNT || options.len() != MCQ_OPTION_COUNT {
        return Err(ValidationError::McqOptions {
            index,
            found: options.len(),
        });
    }
    Ok(options)
}

/// A trimmed, non-empty string (numbers are accepted and rendered as text).
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_text)
}

/// Marks above this are treated as missing.
const MAX_QUESTION_MARKS: f64 = 100.0;

fn marks_field(value: Option<&Value>) -> Option<u32> {
    let marks = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (marks.is_finite() && (1.0..=MAX_QUESTION_MARKS).contains(&marks)).then(|| marks.round() as u32)
}

//=========================================================================================
// Fallback
//=========================================================================================

/// Well-formed placeholder questions used when a batch cannot be recovered.
pub fn fallback_questions(
    question_type: QuestionType,
    difficulty: Difficulty,
    count: usize,
    ids: IdSeed,
) -> Vec<GeneratedQuestion> {
    (0..count)
        .map(|index| fallback_question(question_type, difficulty, ids.id(index)))
        .collect()
}

fn fallback_question(
    question_type: QuestionType,
    difficulty: Difficulty,
    id: String,
) -> GeneratedQuestion {
    let (question, options, correct_answer) = match question_type {
        QuestionType::Mcq => {
            let options: Vec<String> = ["Option A", "Option B", "Option C", "Option D"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            let answer = options[0].clone();
            (
                "Which of the following statements is correct?".to_string(),
                Some(options),
                answer,
            )
        }
        QuestionType::Descriptive => (
            "Explain the key concepts of this topic in detail.".to_string(),
            None,
            "A complete answer should define the key concepts, explain how they relate and support the explanation with examples.".to_string(),
        ),
        QuestionType::CaseStudy => (
            "Analyse the given scenario and recommend a course of action.".to_string(),
            None,
            "A complete answer should identify the core issues in the scenario, apply the relevant theory and justify a recommendation.".to_string(),
        ),
    };

    GeneratedQuestion {
        id,
        question,
        options,
        correct_answer,
        explanation: "This placeholder question was generated because the model response could not be used. Please regenerate.".to_string(),
        marks: question_type.default_marks(),
        question_type,
        difficulty,
        reasoning: None,
    }
}
