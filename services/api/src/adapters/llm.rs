//! services/api/src/adapters/llm.rs
//!
//! This module contains the adapter for the language-model backend.
//! It implements the `CompletionService` port from the `core` crate on top of the
//! chat-completions API of any OpenAI-compatible provider.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use content_pipeline_core::ports::{
    ChatMessage, CompletionRequest, CompletionService, PortError, PortResult, Role, TextStream,
};
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    timeout: Duration,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    ///
    /// `timeout` bounds the full round trip of a completion and the gap between
    /// two chunks of a stream.
    pub fn new(client: Client<OpenAIConfig>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds the underlying client from a key and an optional base URL.
    pub fn from_credentials(api_key: &str, api_base: Option<&str>, timeout: Duration) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self::new(Client::with_config(config), timeout)
    }

    fn build_request(request: &CompletionRequest) -> PortResult<CreateChatCompletionRequest> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<PortResult<Vec<_>>>()?;

        CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

fn to_openai_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
    let content = message.content.as_str();
    let built = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::System),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map(ChatCompletionRequestMessage::User),
    };
    built.map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn complete(&self, request: &CompletionRequest) -> PortResult<String> {
        let openai_request = Self::build_request(request)?;
        debug!(model = %request.model, "Requesting completion");

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(openai_request))
            .await
            .map_err(|_| PortError::Transport(format!("no response within {:?}", self.timeout)))?
            .map_err(|e: OpenAIError| PortError::Transport(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidResponse("completion contained no text content".to_string())
            })
    }

    async fn complete_streaming(&self, request: &CompletionRequest) -> PortResult<TextStream> {
        let openai_request = Self::build_request(request)?;
        debug!(model = %request.model, "Opening completion stream");

        let mut upstream =
            tokio::time::timeout(self.timeout, self.client.chat().create_stream(openai_request))
                .await
                .map_err(|_| PortError::Transport(format!("stream not opened within {:?}", self.timeout)))?
                .map_err(|e: OpenAIError| PortError::Transport(e.to_string()))?;

        let timeout = self.timeout;
        let stream = async_stream::stream! {
            loop {
                match tokio::time::timeout(timeout, upstream.next()).await {
                    Err(_) => {
                        yield Err(PortError::Transport(format!("stream stalled for {:?}", timeout)));
                        break;
                    }
                    Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        yield Err(PortError::Transport(e.to_string()));
                        break;
                    }
                    Ok(Some(Ok(chunk))) => {
                        for choice in chunk.choices {
                            if let Some(delta) = choice.delta.content.filter(|d| !d.is_empty()) {
                                yield Ok(delta);
                            }
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_messages_and_sampling_settings() {
        let request = CompletionRequest::new("gpt-4o-mini", "system text", "user text")
            .with_temperature(0.3)
            .with_max_tokens(512);
        let built = OpenAiCompletionAdapter::build_request(&request).unwrap();
        assert_eq!(built.model, "gpt-4o-mini");
        assert_eq!(built.messages.len(), 2);
        assert!(matches!(built.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(built.messages[1], ChatCompletionRequestMessage::User(_)));
        assert_eq!(built.temperature, Some(0.3));
    }
}
