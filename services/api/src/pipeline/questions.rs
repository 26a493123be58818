//! services/api/src/pipeline/questions.rs
//!
//! Batched question generation. Each batch is one bounded backend request; batches
//! run strictly one after another and the growing result is published after each.

use super::{require_text, ContentPipeline};
use content_pipeline_core::demo::demo_questions;
use content_pipeline_core::domain::{GeneratedQuestion, GenerationRequest, QuestionType};
use content_pipeline_core::ports::{CompletionRequest, PortError, PortResult};
use content_pipeline_core::prompts::{question_generation_prompt, QUESTION_SYSTEM_PROMPT};
use content_pipeline_core::validator::{fallback_questions, parse_questions, IdSeed};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Questions requested per backend call.
pub const BATCH_SIZE: usize = 3;

/// Upper bound on the questions one generation call may ask for.
pub const MAX_QUESTION_COUNT: usize = 50;

/// Progress reported to the caller after each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    /// 1-based number of the batch that just finished.
    pub batch: usize,
    pub completed: usize,
    pub total: usize,
}

fn max_tokens_for(question_type: QuestionType, count: usize) -> u32 {
    let per_question: u32 = match question_type {
        QuestionType::Mcq => 350,
        QuestionType::Descriptive => 700,
        QuestionType::CaseStudy => 900,
    };
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    per_question.saturating_mul(count).saturating_add(200).min(4000)
}

fn validate_request(request: &GenerationRequest) -> PortResult<()> {
    require_text("subject", &request.subject)?;
    require_text("topic", &request.topic)?;
    if request.count == 0 {
        return Err(PortError::InvalidRequest(
            "count must be at least 1".to_string(),
        ));
    }
    if request.count > MAX_QUESTION_COUNT {
        return Err(PortError::InvalidRequest(format!(
            "count must be at most {}, got {}",
            MAX_QUESTION_COUNT, request.count
        )));
    }
    Ok(())
}

impl ContentPipeline {
    /// Generates one batch of `request.count` questions, at most `BATCH_SIZE`.
    ///
    /// Never fails for bad model output or transport problems: those produce
    /// fallback questions instead. Only an invalid request is an error.
    pub async fn generate_questions(
        &self,
        request: &GenerationRequest,
    ) -> PortResult<Vec<GeneratedQuestion>> {
        validate_request(request)?;
        if request.count > BATCH_SIZE {
            return Err(PortError::InvalidRequest(format!(
                "a single batch holds at most {} questions, got {}; use batched generation",
                BATCH_SIZE, request.count
            )));
        }
        Ok(self.generate_batch(request, IdSeed::now()).await)
    }

    /// Generates `request.count` questions in batches of `BATCH_SIZE`.
    ///
    /// `on_batch` receives the accumulated list after every batch. When `cancel`
    /// fires, the call stops before the next batch and returns what it has.
    pub async fn generate_questions_batched<F>(
        &self,
        request: &GenerationRequest,
        mut on_batch: F,
        cancel: &CancellationToken,
    ) -> PortResult<Vec<GeneratedQuestion>>
    where
        F: FnMut(&[GeneratedQuestion], BatchProgress) + Send,
    {
        validate_request(request)?;

        let total = request.count;
        let seed = IdSeed::now();
        let mut accumulated: Vec<GeneratedQuestion> = Vec::new();
        let mut batch = 0;

        info!(
            "Generating {} {} questions on '{}' in batches of {}",
            total, request.question_type, request.topic, BATCH_SIZE
        );

        while accumulated.len() < total {
            let remaining = total - accumulated.len();
            let batch_request = request.with_count(remaining.min(BATCH_SIZE));
            let ids = seed.advanced(accumulated.len());

            let questions = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Question generation cancelled after {} of {} questions", accumulated.len(), total);
                    return Ok(accumulated);
                }
                questions = self.generate_batch(&batch_request, ids) => questions,
            };

            batch += 1;
            accumulated.extend(questions);
            on_batch(
                &accumulated,
                BatchProgress {
                    batch,
                    completed: accumulated.len(),
                    total,
                },
            );
        }

        Ok(accumulated)
    }

    async fn generate_batch(
        &self,
        request: &GenerationRequest,
        ids: IdSeed,
    ) -> Vec<GeneratedQuestion> {
        let Some(backend) = self.gate.backend() else {
            self.gate.simulate_latency().await;
            return demo_questions(request, ids);
        };

        let prompt = question_generation_prompt(
            &request.subject,
            &request.topic,
            request.question_type,
            request.difficulty,
            request.count,
        );
        let completion = CompletionRequest::new(
            &self.models.question_model,
            QUESTION_SYSTEM_PROMPT,
            prompt,
        )
        .with_temperature(0.7)
        .with_max_tokens(max_tokens_for(request.question_type, request.count));

        match backend.complete(&completion).await {
            Ok(raw) => parse_questions(
                &raw,
                request.question_type,
                request.difficulty,
                request.count,
                ids,
            ),
            Err(e) => {
                warn!("Question batch request failed, using fallback questions: {}", e);
                fallback_questions(request.question_type, request.difficulty, request.count, ids)
            }
        }
    }
}
