//! services/api/src/pipeline/thoughts.rs
//!
//! The streaming thought collector: turns the token stream of the reasoning prompt
//! into live-updating `StreamingThought` lists.

use super::ContentPipeline;
use content_pipeline_core::demo::{fallback_thought_lines, fallback_thoughts};
use content_pipeline_core::domain::{Difficulty, QuestionType, StreamingThought};
use content_pipeline_core::ports::{CompletionRequest, CompletionService};
use content_pipeline_core::prompts::{thought_chain_prompt, THOUGHT_SYSTEM_PROMPT};
use content_pipeline_core::ThoughtAssembler;
use futures::StreamExt;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The subject of one reasoning stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtChainRequest {
    pub subject: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
}

impl ContentPipeline {
    /// Streams the design reasoning for a question set.
    ///
    /// `on_update` receives the full ordered thought list after every fragment and
    /// once more when the stream ends. Backend failures never reach the caller:
    /// they produce one final update with the five fallback thoughts. When `cancel`
    /// fires no further updates are sent.
    pub async fn generate_thought_chain<F>(
        &self,
        request: &ThoughtChainRequest,
        mut on_update: F,
        cancel: &CancellationToken,
    ) where
        F: FnMut(Vec<StreamingThought>) + Send,
    {
        match self.gate.backend() {
            Some(backend) => {
                self.stream_live(backend.as_ref(), request, &mut on_update, cancel)
                    .await
            }
            None => self.stream_demo(request, &mut on_update, cancel).await,
        }
    }

    async fn stream_live<F>(
        &self,
        backend: &dyn CompletionService,
        request: &ThoughtChainRequest,
        on_update: &mut F,
        cancel: &CancellationToken,
    ) where
        F: FnMut(Vec<StreamingThought>) + Send,
    {
        let prompt = thought_chain_prompt(
            &request.subject,
            &request.topic,
            request.question_type,
            request.difficulty,
        );
        let completion = CompletionRequest::new(&self.models.thought_model, THOUGHT_SYSTEM_PROMPT, prompt)
            .with_temperature(0.7)
            .with_max_tokens(500);

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Thought chain cancelled before the stream opened");
                return;
            }
            opened = backend.complete_streaming(&completion) => opened,
        };

        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Thought stream could not be opened, using fallback thoughts: {}", e);
                on_update(fallback_for(request));
                return;
            }
        };

        let mut assembler = ThoughtAssembler::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Thought chain cancelled after {} thoughts", assembler.closed_count());
                    return;
                }
                next = stream.next() => next,
            };

            match next {
                Some(Ok(fragment)) => {
                    assembler.push_fragment(&fragment);
                    on_update(assembler.snapshot());
                }
                Some(Err(e)) => {
                    warn!("Thought stream failed mid-way, using fallback thoughts: {}", e);
                    on_update(fallback_for(request));
                    return;
                }
                None => break,
            }
        }

        let thoughts = assembler.finish();
        debug!("Thought stream finished with {} thoughts", thoughts.len());
        on_update(thoughts);
    }

    /// Replays the fallback sentences through the assembler so demo callers
    /// still see thoughts grow one by one.
    async fn stream_demo<F>(
        &self,
        request: &ThoughtChainRequest,
        on_update: &mut F,
        cancel: &CancellationToken,
    ) where
        F: FnMut(Vec<StreamingThought>) + Send,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = self.gate.simulate_latency() => {}
        }

        let lines = fallback_thought_lines(&request.subject, &request.topic, request.difficulty);
        let interval = self.gate.demo_line_interval();
        let last = lines.len().saturating_sub(1);
        let mut assembler = ThoughtAssembler::new();

        for (i, line) in lines.iter().enumerate() {
            if cancel.is_cancelled() {
                return;
            }
            assembler.push_fragment(line);
            if i < last {
                assembler.push_fragment("\n");
            }
            on_update(assembler.snapshot());
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        if !cancel.is_cancelled() {
            on_update(assembler.finish());
        }
    }
}

fn fallback_for(request: &ThoughtChainRequest) -> Vec<StreamingThought> {
    fallback_thoughts(&request.subject, &request.topic, request.difficulty)
}
