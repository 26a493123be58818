//! services/api/src/pipeline/analysis.rs
//!
//! Exam-paper analysis. The one operation where failure is surfaced to the caller:
//! a grading report that cannot be parsed is an error, never a silent placeholder.

use super::{require_text, ContentPipeline};
use content_pipeline_core::analysis::parse_exam_analysis;
use content_pipeline_core::demo::demo_exam_analysis;
use content_pipeline_core::domain::ExamAnalysisResult;
use content_pipeline_core::ports::{CompletionRequest, PortError, PortResult};
use content_pipeline_core::prompts::{exam_analysis_prompt, ANALYSIS_SYSTEM_PROMPT};
use tracing::{error, info};

impl ContentPipeline {
    /// Grades extracted answer text against `total_marks`.
    pub async fn analyze_exam_paper(
        &self,
        text: &str,
        subject: &str,
        total_marks: u32,
    ) -> PortResult<ExamAnalysisResult> {
        require_text("text", text)?;
        require_text("subject", subject)?;
        if total_marks == 0 {
            return Err(PortError::InvalidRequest(
                "total marks must be at least 1".to_string(),
            ));
        }

        let Some(backend) = self.gate.backend() else {
            self.gate.simulate_latency().await;
            let result = demo_exam_analysis(&mut rand::thread_rng(), subject);
            info!("Returning simulated exam analysis with score {}", result.score);
            return Ok(result);
        };

        let completion = CompletionRequest::new(
            &self.models.analysis_model,
            ANALYSIS_SYSTEM_PROMPT,
            exam_analysis_prompt(text, subject, total_marks),
        )
        .with_temperature(0.3)
        .with_max_tokens(1500);

        let raw = backend.complete(&completion).await.map_err(|e| {
            error!("Exam analysis request failed: {}", e);
            e
        })?;

        parse_exam_analysis(&raw).map_err(|e| {
            error!("Exam analysis response rejected: {}", e);
            PortError::InvalidResponse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{demo_pipeline, live_pipeline, ScriptedBackend};

    #[tokio::test]
    async fn live_report_is_parsed() {
        let backend = ScriptedBackend::with_completions(vec![Ok(
            r#"{"score": 81, "feedback": "Well argued.", "strengths": ["Structure"], "weaknesses": [], "suggestions": ["More data"]}"#.to_string(),
        )]);
        let pipeline = live_pipeline(backend.clone());

        let result = pipeline.analyze_exam_paper("Answer 1: ...", "Geography", 100).await.unwrap();
        assert_eq!(result.score, 81);
        assert_eq!(result.strengths, ["Structure"]);

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].model, "gpt-4o");
        assert!(requests[0].messages[1].content.contains("Answer 1: ..."));
    }

    #[tokio::test]
    async fn unparseable_report_is_a_hard_error() {
        let backend = ScriptedBackend::with_completions(vec![Ok("Great work overall!".to_string())]);
        let pipeline = live_pipeline(backend);

        let err = pipeline.analyze_exam_paper("text", "History", 50).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let backend = ScriptedBackend::with_completions(vec![Err(PortError::Transport("timeout".into()))]);
        let pipeline = live_pipeline(backend);

        let err = pipeline.analyze_exam_paper("text", "History", 50).await.unwrap_err();
        assert!(matches!(err, PortError::Transport(_)));
    }

    #[tokio::test]
    async fn demo_reports_keep_their_shape() {
        let pipeline = demo_pipeline();
        for _ in 0..25 {
            let result = pipeline.analyze_exam_paper("...", "Geography", 100).await.unwrap();
            assert!((60..=90).contains(&result.score));
            assert_eq!(result.keyword_analysis.unwrap().len(), 2);
            assert_eq!(result.question_analysis.unwrap().len(), 1);
            assert_eq!(result.strengths.len(), 3);
        }
    }

    #[tokio::test]
    async fn demo_analysis_resolves_within_the_delay_bound() {
        use crate::pipeline::testing::default_models;
        use crate::pipeline::CredentialGate;
        use content_pipeline_core::demo::DemoDelay;
        use std::time::Duration;

        let delay = DemoDelay {
            min: Duration::from_millis(5),
            max: Duration::from_millis(40),
        };
        let pipeline = ContentPipeline::new(CredentialGate::Demo(delay), default_models());

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            pipeline.analyze_exam_paper("Answer 1: rivers erode valleys.", "Geography", 100),
        )
        .await
        .expect("demo analysis should not hang")
        .unwrap();
        assert!((60..=90).contains(&result.score));
    }

    #[tokio::test]
    async fn empty_answer_text_is_rejected() {
        let pipeline = demo_pipeline();
        let err = pipeline.analyze_exam_paper("  ", "Geography", 100).await.unwrap_err();
        assert!(matches!(err, PortError::InvalidRequest(_)));
    }
}
