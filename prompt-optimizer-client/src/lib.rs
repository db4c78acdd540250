//! HTTP text-generation client for the prompt optimizer.
//!
//! [`GeminiClient`] speaks the `generateContent` REST endpoint and implements
//! [`prompt_optimizer_core::TextGenerator`]. Each call is a single attempt;
//! retries and backoff belong to the pipeline.
//!
//! ```rust,no_run
//! use prompt_optimizer_client::{ClientConfig, GeminiClient};
//! use prompt_optimizer_core::{GenerationSettings, TextGenerator};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(ClientConfig::from_env()?)?;
//! let text = client
//!     .generate("Explain ownership in Rust", &GenerationSettings::new(0.7, 1024))
//!     .await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use config::{ClientConfig, ClientConfigBuilder, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{ClientError, ClientResult};
