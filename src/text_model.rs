use std::sync::Arc;
use std::time::Duration;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::models::{ChatMessage, ChatRequest};
use crate::transport::Transport;

/// Text from the model, or the reason there is none
pub type ModelReply = Result<String, ModelError>;

/// Bounded, single-attempt access to the text model.
///
/// Owns the timeout and error classification and nothing else: prompts are
/// built by the orchestrators and replies are interpreted by `parser`.
#[derive(Clone)]
pub struct TextModelClient {
    tx: Arc<dyn Transport>,
    model: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl TextModelClient {
    pub fn new(tx: Arc<dyn Transport>, model: String, timeout: Duration) -> Self {
        Self {
            tx,
            model,
            timeout,
            temperature: 0.3,
            max_tokens: 800,
        }
    }

    pub fn from_config(tx: Arc<dyn Transport>, cfg: &ModelConfig) -> Self {
        Self {
            tx,
            model: cfg.model.clone(),
            timeout: cfg.timeout(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, messages: Vec<ChatMessage>) -> ModelReply {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match tokio::time::timeout(self.timeout, self.tx.chat(&request)).await {
            Ok(Ok(response)) => Ok(response.first_text()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ModelError::Timeout(self.timeout)),
        }
    }

    /// Single user turn, the shape every orchestrator prompt uses
    pub async fn prompt(&self, content: String) -> ModelReply {
        self.complete(vec![ChatMessage::user(content)]).await
    }
}
