use serde::{Serialize, Deserialize};
use reqwest::Client;

use crate::errors::ProviderError;
use crate::providers::chat::build_http_client;

/// Client for the OpenAI legacy completions API
pub struct CompletionClient {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    api_base: String,
    /// Model name
    model: String,
}

/// Legacy completions request
#[derive(Debug, Serialize)]
pub struct CompletionRequest {
    /// The prompt to complete
    prompt: String,

    /// The model to use
    model: String,

    /// Maximum number of tokens to generate
    max_tokens: u32,

    /// Temperature for generation
    temperature: f32,

    /// Top probability mass to consider (nucleus sampling)
    top_p: f32,
}

/// Legacy completions response
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    /// The completion choices
    pub choices: Vec<CompletionChoice>,
}

/// Individual choice in a legacy completions response
#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    /// The generated text
    pub text: String,
}

impl CompletionRequest {
    /// Create a completion request for a prompt
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: 1024,
            temperature: 1.0,
            top_p: 1.0,
        }
    }
}

impl CompletionClient {
    /// Create a new legacy completions client
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

    /// Complete a prompt through the legacy endpoint
    pub async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, ProviderError> {
        let api_url = format!("{}/v1/completions", self.api_base.trim_end_matches('/'));
        let request = CompletionRequest::new(self.model.clone(), prompt);

        let response = self.client.post(&api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(
                format!("Failed to send request to completions API: {}", e),
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

        let completion_response = response.json::<CompletionResponse>().await
            .map_err(|e| ProviderError::ParseError(
                format!("Failed to parse completions API response: {}", e),
            ))?;

        Self::extract_text(&completion_response)
            .ok_or_else(|| ProviderError::ParseError("No choices in completions API response".to_string()))
    }

    /// Extract the completion text from a legacy response
    pub fn extract_text(response: &CompletionResponse) -> Option<String> {
        response.choices.first()
            .map(|choice| choice.text.trim().to_string())
    }
}
