//! A scripted in-memory `CompletionService` for pipeline tests.

use async_trait::async_trait;
use content_pipeline_core::demo::DemoDelay;
use content_pipeline_core::ports::{
    CompletionRequest, CompletionService, PortError, PortResult, TextStream,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{ContentPipeline, CredentialGate, ModelSettings};
use crate::config::Config;

pub(crate) enum ScriptedStream {
    FailToOpen,
    Items(Vec<PortResult<String>>),
    Endless,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    completions: Mutex<VecDeque<PortResult<String>>>,
    streams: Mutex<VecDeque<ScriptedStream>>,
    pub(crate) requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn with_completions(completions: Vec<PortResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            completions: Mutex::new(completions.into()),
            ..Default::default()
        })
    }

    pub(crate) fn with_stream(stream: ScriptedStream) -> Arc<Self> {
        Arc::new(Self {
            streams: Mutex::new(VecDeque::from([stream])),
            ..Default::default()
        })
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> PortResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Transport("script exhausted".to_string())))
    }

    async fn complete_streaming(&self, request: &CompletionRequest) -> PortResult<TextStream> {
        self.requests.lock().unwrap().push(request.clone());
        match self.streams.lock().unwrap().pop_front() {
            Some(ScriptedStream::Items(items)) => Ok(Box::pin(futures::stream::iter(items))),
            Some(ScriptedStream::Endless) => Ok(Box::pin(futures::stream::pending())),
            Some(ScriptedStream::FailToOpen) | None => {
                Err(PortError::Transport("connection refused".to_string()))
            }
        }
    }
}

/// The models an unconfigured environment resolves to.
pub(crate) fn default_models() -> ModelSettings {
    let config = Config::from_lookup(|_| None).expect("empty environment is a valid config");
    ModelSettings::from_config(&config)
}

pub(crate) fn live_pipeline(backend: Arc<ScriptedBackend>) -> ContentPipeline {
    ContentPipeline::new(CredentialGate::Live(backend), default_models())
}

pub(crate) fn demo_pipeline() -> ContentPipeline {
    ContentPipeline::new(CredentialGate::Demo(DemoDelay::none()), default_models())
}
