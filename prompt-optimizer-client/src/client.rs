//! HTTP client for the `generateContent` endpoint

use async_trait::async_trait;
use prompt_optimizer_core::{GenerationError, GenerationSettings, TextGenerator};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: url::Url,
    config: ClientConfig,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let mut key = header::HeaderValue::try_from(config.api_key.as_str())
            .map_err(|_| ClientError::Configuration("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// One request, no retries.
    pub async fn generate_content(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> ClientResult<String> {
        let body = GenerateContentRequest::new(prompt, settings);

        if self.config.enable_logging {
            debug!(model = %self.config.model, body = %serde_json::to_string(&body)?, "Request");
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let retry_after = retry_after(response.headers());
        let text = response.text().await?;

        if self.config.enable_logging {
            debug!(status = status.as_u16(), body = %text, "Response");
        }

        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(retry_after = ?retry_after, "Rate limited by generation service");
            }
            return Err(ClientError::from_response(status.as_u16(), &text, retry_after));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        parsed
            .text()
            .ok_or_else(|| ClientError::EmptyResponse(parsed.empty_reason()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        self.generate_content(prompt, settings).await.map_err(|e| {
            debug!(error = %e, "Generation request failed");
            GenerationError::from(e)
        })
    }
}

/// `Retry-After` in delta-seconds form.
fn retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = header::HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(header::RETRY_AFTER, header::HeaderValue::from_static("12"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(12)));

        headers.insert(
            header::RETRY_AFTER,
            header::HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn test_new_rejects_missing_key() {
        assert!(matches!(
            GeminiClient::new(ClientConfig::new("")),
            Err(ClientError::MissingApiKey)
        ));
    }
}
