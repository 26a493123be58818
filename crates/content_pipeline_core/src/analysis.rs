//! crates/content_pipeline_core/src/analysis.rs
//!
//! Strict parsing of exam-analysis reports. Unlike question generation there is no
//! silent recovery here: a report that cannot be trusted is an error for the caller.

use crate::domain::ExamAnalysisResult;
use crate::sanitize::sanitize_model_json;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis is not a valid report object: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("analysis score {0} is outside 0-100")]
    ScoreOutOfRange(u32),
    #[error("analysis feedback is empty")]
    EmptyFeedback,
    #[error("question number {0} appears more than once")]
    DuplicateQuestion(u32),
}

pub fn parse_exam_analysis(raw: &str) -> Result<ExamAnalysisResult, AnalysisError> {
    let cleaned = sanitize_model_json(raw);
    let mut result: ExamAnalysisResult = serde_json::from_str(&cleaned)?;

    if result.score > 100 {
        return Err(AnalysisError::ScoreOutOfRange(result.score));
    }
    result.feedback = result.feedback.trim().to_string();
    if result.feedback.is_empty() {
        return Err(AnalysisError::EmptyFeedback);
    }

    if let Some(questions) = &result.question_analysis {
        let mut seen = HashSet::new();
        for q in questions {
            if !seen.insert(q.question_number) {
                return Err(AnalysisError::DuplicateQuestion(q.question_number));
            }
        }
    }

    for list in [&mut result.strengths, &mut result.weaknesses, &mut result.suggestions] {
        list.retain(|item| !item.trim().is_empty());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"```json
{"score": 72, "feedback": " Solid grasp of landforms. ",
 "strengths": ["Clear diagrams", ""], "weaknesses": ["Few case studies"], "suggestions": ["Cite examples"],
 "keywordAnalysis": [{"keyword": "erosion", "present": true}],
 "questionAnalysis": [{"questionNumber": 1, "score": 8, "feedback": "Good", "improvement": "Add depth"}]}
```"#;

    #[test]
    fn parses_a_fenced_report() {
        let result = parse_exam_analysis(REPORT).unwrap();
        assert_eq!(result.score, 72);
        assert_eq!(result.feedback, "Solid grasp of landforms.");
        assert_eq!(result.strengths, ["Clear diagrams"]);
        assert_eq!(result.keyword_analysis.unwrap()[0].keyword, "erosion");
        assert_eq!(result.question_analysis.unwrap()[0].question_number, 1);
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let result = parse_exam_analysis(r#"{"score": 50, "feedback": "Fine"}"#).unwrap();
        assert!(result.strengths.is_empty());
        assert!(result.keyword_analysis.is_none());
    }

    #[test]
    fn malformed_report_is_an_error() {
        assert!(matches!(parse_exam_analysis("The student did well."), Err(AnalysisError::Malformed(_))));
        assert!(matches!(parse_exam_analysis(r#"{"feedback": "no score"}"#), Err(AnalysisError::Malformed(_))));
    }

    #[test]
    fn out_of_range_score_is_an_error() {
        let err = parse_exam_analysis(r#"{"score": 140, "feedback": "x"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::ScoreOutOfRange(140)));
    }

    #[test]
    fn blank_feedback_is_an_error() {
        let err = parse_exam_analysis(r#"{"score": 40, "feedback": "   "}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyFeedback));
    }

    #[test]
    fn duplicate_question_numbers_are_an_error() {
        let raw = r#"{"score": 40, "feedback": "x", "questionAnalysis": [
            {"questionNumber": 2, "score": 1, "feedback": "a", "improvement": "b"},
            {"questionNumber": 2, "score": 3, "feedback": "c", "improvement": "d"}]}"#;
        assert!(matches!(parse_exam_analysis(raw), Err(AnalysisError::DuplicateQuestion(2))));
    }
}
