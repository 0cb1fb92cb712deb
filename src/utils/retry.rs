//! Retry utilities with exponential backoff for resilient API calls.

use std::time::Duration;
use tokio::time::sleep;

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry configuration tuned for the arXiv API
pub fn api_retry_config() -> RetryConfig {
    RetryConfig::default()
}

/// Whether an error is worth retrying.
///
/// Network failures and API-side hiccups are transient; parse errors and
/// invalid requests are not.
fn is_transient(err: &SourceError) -> bool {
    match err {
        SourceError::Network(_) => true,
        SourceError::Api(msg) => {
            let msg = msg.to_lowercase();
            msg.contains("timeout")
                || msg.contains("429")
                || msg.contains("503")
                || msg.contains("unavailable")
        }
        _ => false,
    }
}

/// Execute an async operation, retrying transient failures with
/// exponential backoff.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!("Operation succeeded on attempt {}", attempt);
                }
                return Ok(result);
            }
            Err(error) => {
                if !is_transient(&error) || attempt >= config.max_attempts {
                    return Err(error);
                }

                let exp = config.initial_delay.as_secs_f64()
                    * config.backoff_multiplier.powi(attempt as i32 - 1);
                let delay = Duration::from_secs_f64(exp.min(config.max_delay.as_secs_f64()));

                tracing::debug!(
                    "Transient error on attempt {}: {}, retrying in {:?}",
                    attempt,
                    error,
                    delay
                );
                sleep(delay).await;
            }
        }
    }
}
