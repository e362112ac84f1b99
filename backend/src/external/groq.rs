//! Groq inference client
//!
//! Talks to the OpenAI-compatible `/chat/completions` endpoint with text and
//! image content parts.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GroqConfig;
use crate::error::{AppError, AppResult};

/// Client for the hosted vision/text model
#[derive(Clone)]
pub struct GroqClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_p: f32,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// One message sent to the model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionMessage {
    pub role: String,
    pub content: CompletionContent,
}

impl CompletionMessage {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: CompletionContent::Text(text.into()),
        }
    }

    pub fn parts(role: &str, parts: Vec<ContentPart>) -> Self {
        Self {
            role: role.to_string(),
            content: CompletionContent::Parts(parts),
        }
    }
}

/// Message content: a plain string or a list of typed parts
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CompletionContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl GroqClient {
    /// Create a client from configuration
    pub fn new(config: &GroqConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a chat completion and return the first choice's text
    ///
    /// A response without content yields an empty string.
    pub async fn complete(
        &self,
        messages: &[CompletionMessage],
        max_tokens: u32,
    ) -> AppResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens,
            top_p: self.top_p,
            stream: false,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Inference(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Inference(format!("Failed to parse response: {}", e)))?;

        Ok(first_choice_content(result))
    }
}

fn first_choice_content(response: ChatCompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}
