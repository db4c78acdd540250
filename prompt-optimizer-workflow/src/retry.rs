//! Bounded retry with exponential backoff and jitter around generator calls.
//!
//! `max_attempts` counts every call, including the first one, and is a hard
//! cap: an operation is never invoked more often than that.

use prompt_optimizer_core::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per operation, the first call included.
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: usize,
    #[serde(with = "duration_ms")]
    pub initial_delay: Duration,
    #[serde(with = "duration_ms")]
    pub max_delay: Duration,
    #[validate(range(min = 1.0))]
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

pub trait RetryPolicy: Send + Sync {
    /// Delay before the next call after `failed_attempts` failures, or `None`
    /// once the attempt budget is spent.
    fn next_delay(&self, failed_attempts: usize) -> Option<Duration>;

    fn max_attempts(&self) -> usize;

    /// Upper bound applied to any delay, including server-provided hints.
    fn max_delay(&self) -> Duration;
}

/// A failure that may carry the upstream service's requested wait.
pub trait BackoffHint {
    fn retry_after(&self) -> Option<Duration>;
}

impl BackoffHint for GenerationError {
    fn retry_after(&self) -> Option<Duration> {
        match self {
            GenerationError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Exponential backoff from `RetryConfig`; with `jitter` set, each delay is
/// drawn uniformly from `[0, delay]`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: RetryConfig,
}

impl ExponentialBackoff {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn next_delay(&self, failed_attempts: usize) -> Option<Duration> {
        if failed_attempts == 0 || failed_attempts >= self.max_attempts() {
            return None;
        }

        let exponent = (failed_attempts - 1).min(i32::MAX as usize) as i32;
        let scaled = self.config.initial_delay.as_secs_f64() * self.config.multiplier.powi(exponent);
        let capped = scaled.min(self.config.max_delay.as_secs_f64());

        let seconds = if self.config.jitter {
            capped * rand::random::<f64>()
        } else {
            capped
        };
        Some(Duration::from_secs_f64(seconds))
    }

    fn max_attempts(&self) -> usize {
        self.config.max_attempts.max(1)
    }

    fn max_delay(&self) -> Duration {
        self.config.max_delay
    }
}

/// The final error of an operation together with how many calls were made.
#[derive(Debug, Clone)]
pub struct RetryError<E> {
    pub error: E,
    pub attempts: usize,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempt(s): {}", self.attempts, self.error)
    }
}

impl<E: std::error::Error> std::error::Error for RetryError<E> {}

/// Call `f` until it succeeds or the policy's attempt budget is spent.
/// Every failure is retried; a rate-limit hint lengthens the backoff but
/// never past the policy's maximum delay.
pub async fn retry<F, Fut, T, E, P>(policy: &P, operation: &str, mut f: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: BackoffHint + fmt::Display,
    P: RetryPolicy + ?Sized,
{
    let mut attempts = 0;

    loop {
        attempts += 1;
        debug!(operation, attempt = attempts, max_attempts = policy.max_attempts(), "Calling generator");

        let error = match f().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(operation, attempts, "Generator call recovered");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        let Some(delay) = policy.next_delay(attempts) else {
            warn!(operation, attempts, error = %error, "Attempt budget exhausted");
            return Err(RetryError { error, attempts });
        };

        let delay = error
            .retry_after()
            .map_or(delay, |hint| delay.max(hint).min(policy.max_delay()));

        warn!(operation, attempt = attempts, ?delay, error = %error, "Generator call failed, backing off");
        sleep(delay).await;
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
