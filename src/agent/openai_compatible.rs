use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::interface::Responder;
use crate::error::{ResponseError, ServiceError};
use crate::service_client::ServiceClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Responder backed by any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAICompatibleResponder {
    service: ServiceClient,
    model: String,
    temperature: f32,
    system_prompt: Option<String>,
}

impl OpenAICompatibleResponder {
    pub fn new(
        service: ServiceClient,
        model: String,
        temperature: f32,
        system_prompt: Option<String>,
    ) -> Self {
        info!(
            "Initialized OpenAICompatibleResponder: model={}, base_url={}",
            model,
            service.base_url()
        );
        Self {
            service,
            model,
            temperature,
            system_prompt,
        }
    }

    fn messages(&self, text: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: text.to_string(),
        });
        messages
    }
}

#[async_trait]
impl Responder for OpenAICompatibleResponder {
    async fn respond(&self, text: &str) -> Result<String, ResponseError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: self.messages(text),
        };

        let response = self.service.post_json("chat/completions", &request).await?;
        let body: ChatCompletionResponse = response.json().await?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("no choices returned".to_string()))?;

        // Providers report moderation refusals through finish_reason
        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ServiceError::Rejected("content_filter".to_string()));
        }

        debug!("Responder produced {} chars", choice.message.content.len());
        Ok(choice.message.content.trim().to_string())
    }
}
