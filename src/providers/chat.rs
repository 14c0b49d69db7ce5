use std::time::Duration;
use serde::{Serialize, Deserialize};
use reqwest::Client;

use crate::errors::ProviderError;

/// Client for OpenAI-compatible chat completions APIs
pub struct ChatClient {
    /// HTTP client for API requests
    client: Client,
    /// API base URL (default public OpenAI, overridable for gateways)
    api_base: String,
    /// Model name
    model: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat message format, shared by requests and responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// The completion choices
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a chat completions response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

impl ChatRequest {
    /// Create a single-turn request carrying one user message
    pub fn single_turn(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: content.into(),
            }],
            temperature: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl ChatClient {
    /// Create a new chat completions client
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        proxy: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let client = build_http_client(timeout_secs, proxy)?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            model: model.into(),
        })
    }

    /// Complete a chat request for the given prompt
    pub async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ProviderError> {
        let api_url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let request = ChatRequest::single_turn(self.model.clone(), prompt);

        let response = self.client.post(&api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(
                format!("Failed to send request to chat API: {}", e),
            ))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let chat_response = response.json::<ChatResponse>().await
            .map_err(|e| ProviderError::ParseError(
                format!("Failed to parse chat API response: {}", e),
            ))?;

        Self::extract_text(&chat_response)
            .ok_or_else(|| ProviderError::ParseError("No choices in chat API response".to_string()))
    }

    /// Extract the completion text from a chat response
    pub fn extract_text(response: &ChatResponse) -> Option<String> {
        response.choices.first()
            .map(|choice| choice.message.content.trim().to_string())
    }
}

/// Build a reqwest client with timeout and optional explicit proxy
pub(crate) fn build_http_client(
    timeout_secs: u64,
    proxy: Option<&str>,
) -> Result<Client, ProviderError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(timeout_secs));
    if let Some(proxy_url) = proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ProviderError::ConnectionError(format!("Invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))
}
