//! # OpenAI Backends
//!
//! Chat-completion and image-generation clients over the OpenAI HTTP API.
//! Invoked only from inside handlers, never from the router or cache.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::config::OpenAiConfig;
use crate::domain::errors::HandlerError;
use crate::domain::traits::{CompletionBackend, ImageBackend};
use crate::domain::types::TranscriptEntry;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_IMAGE_SIZE: &str = "512x512";

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    endpoint: String,
    default_model: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        let default_model = config
            .completion_models
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            default_model,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl From<&TranscriptEntry> for ChatMessage {
    fn from(entry: &TranscriptEntry) -> Self {
        Self {
            role: entry.role.as_str(),
            content: entry.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn generate(
        &self,
        history: &[TranscriptEntry],
        model: Option<&str>,
    ) -> Result<String, HandlerError> {
        let request = ChatRequest {
            model: model.unwrap_or(&self.default_model).to_string(),
            messages: history.iter().map(ChatMessage::from).collect(),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| HandlerError::Backend(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HandlerError::Backend(format!(
                "completion returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| HandlerError::Backend(format!("invalid completion response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| HandlerError::Backend("completion response had no choices".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    prompt: String,
    n: u8,
    size: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: String,
}

#[async_trait]
impl ImageBackend for OpenAiClient {
    async fn generate(&self, prompt: &str, size: Option<&str>) -> Result<String, HandlerError> {
        let request = ImageRequest {
            prompt: prompt.to_string(),
            n: 1,
            size: size.unwrap_or(DEFAULT_IMAGE_SIZE).to_string(),
        };

        let response = self
            .http
            .post(format!("{}/images/generations", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| HandlerError::Backend(format!("image request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HandlerError::Backend(format!(
                "image generation returned {status}: {body}"
            )));
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| HandlerError::Backend(format!("invalid image response: {e}")))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|datum| datum.url)
            .ok_or_else(|| HandlerError::Backend("image response had no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Role;
    use serde_json::json;

    #[test]
    fn chat_messages_map_transcript_roles() {
        let history = [
            TranscriptEntry::system("be brief"),
            TranscriptEntry::user("hi"),
            TranscriptEntry::assistant("hello"),
        ];
        let messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn chat_request_serializes_to_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4".to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".to_string(),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn default_model_is_first_configured() {
        let config = OpenAiConfig {
            api_key: "sk-test".to_string(),
            completion_models: vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()],
            endpoint: None,
        };
        let client = OpenAiClient::new(&config);
        assert_eq!(client.default_model, "gpt-4");
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
    }
}
