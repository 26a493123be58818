//! crates/content_pipeline_core/src/ports.rs
//!
//! Defines the service contracts (traits) the pipeline depends on.
//! The language-model backend is the only external capability, so this is the
//! boundary that keeps the core independent of any particular provider.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP clients).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend could not be reached or failed mid-request.
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The backend answered, but not in a shape we can use.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
    /// The caller supplied parameters that cannot be served.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// An incremental sequence of text deltas, terminated by stream completion.
pub type TextStream = Pin<Box<dyn Stream<Item = PortResult<String>> + Send>>;

//=========================================================================================
// Completion Request Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Everything the backend needs for one completion, streaming or not.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Builds a system + user request, the shape every pipeline operation uses.
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: 0.7,
            max_tokens: 2000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns one full text completion.
    async fn complete(&self, request: &CompletionRequest) -> PortResult<String>;

    /// Returns the completion as a stream of incremental text fragments.
    async fn complete_streaming(&self, request: &CompletionRequest) -> PortResult<TextStream>;
}
