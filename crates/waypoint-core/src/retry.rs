//! Retry helper for provider calls with exponential backoff.
//!
//! Retries transient failures only:
//! - Timeouts and connection errors
//! - 5xx server errors, 408 and 429
//!
//! Other 4xx responses (bad key, not found) are returned immediately.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

use crate::error::{NetworkError, ReqwestErrorExt};

pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// No retries at all; the first outcome is final.
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Calculate the delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }

    if error.is_request() || error.is_decode() {
        return RetryDecision::NoRetry;
    }

    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        tracing::debug!("Status {} is retryable", status);
        return RetryDecision::Retry;
    }

    RetryDecision::NoRetry
}

/// Send a request with retry, returning the first successful response.
///
/// Non-success statuses that survive the retry budget are converted into
/// [`NetworkError::ServerError`], so callers only ever see 2xx responses.
///
/// ```ignore
/// let response = send_with_retry(&retry, || client.get(url).send()).await?;
/// ```
pub async fn send_with_retry<F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> Result<Response, NetworkError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            tracing::info!(
                "Retry attempt {} of {}, waiting {:?}",
                attempt,
                config.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        let can_retry = attempt < config.max_retries;

        match operation().await {
            Ok(response) if response.status().is_success() => {
                if attempt > 0 {
                    tracing::info!("Request succeeded after {} retries", attempt);
                }
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                if can_retry && is_retryable_status(status) == RetryDecision::Retry {
                    tracing::warn!(
                        "Request returned retryable status {}, attempt {} of {}",
                        status,
                        attempt + 1,
                        config.max_retries + 1
                    );
                    attempt += 1;
                    continue;
                }
                return Err(NetworkError::from_response(response).await);
            }
            Err(e) => {
                if can_retry && is_retryable_error(&e) == RetryDecision::Retry {
                    tracing::warn!(
                        "Retryable error on attempt {} of {}: {}",
                        attempt + 1,
                        config.max_retries + 1,
                        e
                    );
                    attempt += 1;
                    continue;
                }
                return Err(e.into_network_error());
            }
        }
    }
}
