//! crates/content_pipeline_core/src/domain.rs
//!
//! Defines the pure, core data structures produced by the content pipeline.
//! Everything here is created fresh per invocation and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Generation Parameters
//=========================================================================================

/// The kind of question requested for a whole generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Mcq,
    Descriptive,
    CaseStudy,
}

impl QuestionType {
    /// The inclusive mark range used when describing the schema to the model.
    pub fn mark_range(self) -> (u32, u32) {
        match self {
            QuestionType::Mcq => (5, 10),
            QuestionType::Descriptive => (10, 20),
            QuestionType::CaseStudy => (20, 30),
        }
    }

    /// The mark awarded when the model omits one.
    pub fn default_marks(self) -> u32 {
        let (low, high) = self.mark_range();
        (low + high) / 2
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::Descriptive => "descriptive",
            QuestionType::CaseStudy => "case-study",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters of one question generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub subject: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: usize,
}

impl GenerationRequest {
    pub fn new(
        subject: impl Into<String>,
        topic: impl Into<String>,
        question_type: QuestionType,
        difficulty: Difficulty,
        count: usize,
    ) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            question_type,
            difficulty,
            count,
        }
    }

    /// Returns the same request narrowed to `count` questions.
    pub fn with_count(&self, count: usize) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }
}

//=========================================================================================
// Generated Content
//=========================================================================================

/// One produced exam question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    pub question: String,
    /// Present only for `QuestionType::Mcq`, always with exactly four entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    pub explanation: String,
    pub marks: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// One unit of reasoning text emitted by the thought collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingThought {
    pub id: String,
    pub content: String,
    pub is_complete: bool,
}

impl StreamingThought {
    /// Builds the id for the `n`th thought (1-based).
    pub fn id_for(n: usize) -> String {
        format!("thought-{}", n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub keyword: String,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalysis {
    pub question_number: u32,
    pub score: u32,
    pub feedback: String,
    pub improvement: String,
}

/// The report produced by grading an exam paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnalysisResult {
    pub score: u32,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_analysis: Option<Vec<KeywordAnalysis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_analysis: Option<Vec<QuestionAnalysis>>,
}

/// A frequently-asked question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marks_are_range_midpoints() {
        assert_eq!(QuestionType::Mcq.default_marks(), 7);
        assert_eq!(QuestionType::Descriptive.default_marks(), 15);
        assert_eq!(QuestionType::CaseStudy.default_marks(), 25);
    }

    #[test]
    fn question_serializes_with_camel_case_wire_names() {
        let q = GeneratedQuestion {
            id: "1-0".to_string(),
            question: "Q".to_string(),
            options: None,
            correct_answer: "A".to_string(),
            explanation: "E".to_string(),
            marks: 15,
            question_type: QuestionType::CaseStudy,
            difficulty: Difficulty::Hard,
            reasoning: None,
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["correctAnswer"], "A");
        assert_eq!(json["type"], "case-study");
        assert_eq!(json["difficulty"], "hard");
        assert!(json.get("options").is_none());
    }
}
