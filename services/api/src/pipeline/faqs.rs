//! services/api/src/pipeline/faqs.rs

use super::{require_text, ContentPipeline};
use content_pipeline_core::demo::fallback_faqs;
use content_pipeline_core::domain::Faq;
use content_pipeline_core::faq::parse_faqs;
use content_pipeline_core::ports::{CompletionRequest, PortError, PortResult};
use content_pipeline_core::prompts::{faq_prompt, FAQ_SYSTEM_PROMPT};
use tracing::warn;

pub const DEFAULT_FAQ_COUNT: usize = 5;

impl ContentPipeline {
    /// Generates up to `count` FAQs for a topic.
    ///
    /// Like question generation this never fails on model output: unusable
    /// responses fall back to a fixed list.
    pub async fn generate_faqs(
        &self,
        subject: &str,
        topic: &str,
        count: usize,
    ) -> PortResult<Vec<Faq>> {
        require_text("subject", subject)?;
        require_text("topic", topic)?;
        if count == 0 {
            return Err(PortError::InvalidRequest(
                "count must be at least 1".to_string(),
            ));
        }

        let Some(backend) = self.gate.backend() else {
            self.gate.simulate_latency().await;
            return Ok(fallback_capped(subject, topic, count));
        };

        let completion = CompletionRequest::new(
            &self.models.question_model,
            FAQ_SYSTEM_PROMPT,
            faq_prompt(subject, topic, count),
        )
        .with_temperature(0.7)
        .with_max_tokens(1500);

        let raw = match backend.complete(&completion).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("FAQ request failed, using fallback FAQs: {}", e);
                return Ok(fallback_capped(subject, topic, count));
            }
        };

        match parse_faqs(&raw) {
            Ok(mut faqs) if !faqs.is_empty() => {
                faqs.truncate(count);
                Ok(faqs)
            }
            Ok(_) => {
                warn!("Model returned no usable FAQs, using fallback FAQs");
                Ok(fallback_capped(subject, topic, count))
            }
            Err(e) => {
                warn!("FAQ response rejected, using fallback FAQs: {}", e);
                Ok(fallback_capped(subject, topic, count))
            }
        }
    }
}

fn fallback_capped(subject: &str, topic: &str, count: usize) -> Vec<Faq> {
    let mut faqs = fallback_faqs(subject, topic);
    faqs.truncate(count);
    faqs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{demo_pipeline, live_pipeline, ScriptedBackend};

    #[tokio::test]
    async fn live_faqs_are_parsed_and_capped() {
        let backend = ScriptedBackend::with_completions(vec![Ok(
            r#"[{"question": "Q1", "answer": "A1"}, {"question": "Q2", "answer": "A2"}, {"question": "Q3", "answer": "A3"}]"#.to_string(),
        )]);
        let pipeline = live_pipeline(backend);

        let faqs = pipeline.generate_faqs("Physics", "Optics", 2).await.unwrap();
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[1].answer, "A2");
    }

    #[tokio::test]
    async fn malformed_output_falls_back() {
        let backend = ScriptedBackend::with_completions(vec![Ok("no json here".to_string())]);
        let pipeline = live_pipeline(backend);

        let faqs = pipeline.generate_faqs("Physics", "Optics", 5).await.unwrap();
        assert_eq!(faqs, fallback_faqs("Physics", "Optics"));
    }

    #[tokio::test]
    async fn fallback_respects_the_requested_count() {
        let backend = ScriptedBackend::with_completions(vec![Err(PortError::Transport("down".into()))]);
        let pipeline = live_pipeline(backend);

        let faqs = pipeline.generate_faqs("Physics", "Optics", 1).await.unwrap();
        assert_eq!(faqs.len(), 1);
    }

    #[tokio::test]
    async fn demo_mode_uses_the_fixed_list() {
        let faqs = demo_pipeline().generate_faqs("Physics", "Optics", DEFAULT_FAQ_COUNT).await.unwrap();
        assert!(faqs[0].question.contains("Optics"));
    }
}
