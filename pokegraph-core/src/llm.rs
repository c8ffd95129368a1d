//! Chat model seam used by the chain.

use async_trait::async_trait;
use thiserror::Error;

/// Error from a chat model call.
#[derive(Debug, Error)]
#[error("chat model call failed: {message}")]
pub struct ModelError {
    message: String,
}

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A chat-completion model reduced to the single operation the chain needs:
/// prompt text in, completion text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Calls the Chat Completions endpoint with the prompt as a single user
/// message, pinned to temperature zero so runs over the same data stay
/// comparable.
#[async_trait]
impl ChatModel for openai::OpenAi {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let request =
            openai::Request::new(vec![openai::Message::user(prompt)]).with_temperature(0.0);
        let response = self
            .complete(&request)
            .await
            .map_err(|e| ModelError::new(e.to_string()))?;
        Ok(response.text().to_string())
    }
}
