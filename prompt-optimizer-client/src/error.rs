//! Client error types and their mapping onto generator failures

use prompt_optimizer_core::GenerationError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered but produced no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Error body returned by the generation service.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ClientError {
    pub fn from_response(status: u16, body: &str, retry_after: Option<Duration>) -> Self {
        let message = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => match parsed.error.status {
                Some(code) if !parsed.error.message.is_empty() => {
                    format!("{} ({})", parsed.error.message, code)
                }
                _ if !parsed.error.message.is_empty() => parsed.error.message,
                _ => body.trim().to_string(),
            },
            Err(_) => body.trim().to_string(),
        };

        ClientError::Api {
            status,
            message,
            retry_after,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Network(e) => e.is_timeout(),
            ClientError::Api { status, .. } => matches!(status, 408 | 504),
            _ => false,
        }
    }
}

impl From<ClientError> for GenerationError {
    fn from(error: ClientError) -> Self {
        if error.is_timeout() {
            return GenerationError::Timeout;
        }

        match error {
            ClientError::Api {
                status: 429,
                retry_after,
                ..
            } => GenerationError::RateLimited { retry_after },
            other => GenerationError::ServiceError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json_response() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let error = ClientError::from_response(400, body, None);

        match error {
            ClientError::Api { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid (INVALID_ARGUMENT)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_plain_body() {
        let error = ClientError::from_response(502, "bad gateway\n", None);
        assert_eq!(error.to_string(), "API error: 502 - bad gateway");
    }

    #[test]
    fn test_rate_limit_maps_to_rate_limited() {
        let error = ClientError::from_response(429, "{}", Some(Duration::from_secs(7)));
        assert_eq!(
            GenerationError::from(error),
            GenerationError::RateLimited {
                retry_after: Some(Duration::from_secs(7))
            }
        );
    }

    #[test]
    fn test_gateway_timeout_maps_to_timeout() {
        let error = ClientError::from_response(504, "", None);
        assert_eq!(GenerationError::from(error), GenerationError::Timeout);
    }

    #[test]
    fn test_other_errors_map_to_service_error() {
        let error = ClientError::EmptyResponse("no candidates".to_string());
        assert!(matches!(
            GenerationError::from(error),
            GenerationError::ServiceError(msg) if msg.contains("no candidates")
        ));
    }
}
