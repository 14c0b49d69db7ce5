use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::providers::chat::build_http_client;

/// Client for the unofficial Google web translation endpoint
///
/// No API key is involved; the target language code is passed through
/// verbatim as the `tl` query parameter.
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Service base URL
    api_base: String,
}

impl GoogleTranslate {
    /// Create a new Google translation client
    pub fn new(
        api_base: impl Into<String>,
        timeout_secs: u64,
        proxy: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let client = build_http_client(timeout_secs, proxy)?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    /// Translate one text span into the target language
    pub async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let api_url = format!("{}/translate_a/single", self.api_base.trim_end_matches('/'));

        let response = self.client.get(&api_url)
            .query(&[
                ("client", "gtx"),
                ("dt", "t"),
                ("sl", "auto"),
                ("tl", target_language),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(
                format!("Failed to send request to translation endpoint: {}", e),
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

        let body = response.json::<Value>().await
            .map_err(|e| ProviderError::ParseError(
                format!("Failed to parse translation response: {}", e),
            ))?;

        Self::extract_text(&body)
            .ok_or_else(|| ProviderError::ParseError("No segments in translation response".to_string()))
    }

    /// Join the translated segments out of the nested response arrays
    ///
    /// The endpoint answers with `[[["<translated>", "<original>", ...], ...], ...]`;
    /// anything that does not match that shape yields None.
    pub fn extract_text(body: &Value) -> Option<String> {
        let segments = body.get(0)?.as_array()?;
        let mut output = String::new();
        for segment in segments {
            if let Some(translated) = segment.get(0).and_then(Value::as_str) {
                output.push_str(translated);
            }
        }
        if output.is_empty() {
            None
        } else {
            Some(output)
        }
    }
}
