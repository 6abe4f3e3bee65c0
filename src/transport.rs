use async_trait::async_trait;
use reqwest::Client;

#[cfg(test)]
use mockall::automock;

use crate::error::ModelError;
use crate::models::{ChatRequest, ChatResponse};

/// Raw access to a chat-completions style text-generation service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ModelError>;
}

/// OpenAI-compatible HTTP transport. Makes exactly one attempt per call.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse, ModelError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| ModelError::Transport(format!("failed to reach {}: {e}", self.api_url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ModelError::Malformed(format!("failed to parse chat response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server
        let transport = HttpTransport::new(
            "http://127.0.0.1:9/v1/chat/completions".to_string(),
            "sk-test".to_string(),
        );
        let req = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("ping")],
            temperature: 0.0,
            max_tokens: 10,
        };

        let err = transport.chat(&req).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
