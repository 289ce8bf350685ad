//! Retry policy for calls to the propdesk backend
//!
//! Entity creation is not idempotent, so the default policy never retries.
//! Operators can opt in; only throttling, server errors and connection
//! failures are retried.

use reqwest::StatusCode;
use std::time::Duration;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries (will be adjusted based on headers)
    pub base_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
    pub exponential_backoff: bool,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// Single attempt per request
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            exponential_backoff: true,
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::none()
        }
    }

    /// Keep any single wait well inside `budget` (the per-row timeout) so a
    /// long `Retry-After` leaves room for the retried request itself
    pub fn bounded_by(mut self, budget: Duration) -> Self {
        self.max_delay = self.max_delay.min(budget / 2);
        self
    }

    /// Calculate delay for next retry attempt
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        // If server provided Retry-After header, respect it
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let delay = if self.exponential_backoff {
            let multiplier = self.backoff_multiplier.powi(attempt as i32);
            Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64)
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }
}

/// Parse the `Retry-After` header (seconds form) from a throttled response
pub fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    match status.as_u16() {
        // Rate limiting
        429 => true,
        // Timeout-related
        408 => true,
        500..=599 => true,
        _ => false,
    }
}

/// Determines if a transport error is retryable
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    if let Some(status) = error.status() {
        is_retryable_status(status)
    } else {
        error.is_timeout() || error.is_connect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_never_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 0);
    }

    #[test]
    fn test_calculate_delay_with_retry_after() {
        let policy = RetryPolicy::with_max_retries(3);
        let delay = policy.calculate_delay(1, Some(Duration::from_secs(10)));
        assert_eq!(delay, Duration::from_secs(10));

        let capped = policy.calculate_delay(1, Some(Duration::from_secs(600)));
        assert_eq!(capped, Duration::from_secs(30));
    }

    #[test]
    fn test_calculate_delay_exponential_backoff() {
        let policy = RetryPolicy::with_max_retries(3);
        let delay1 = policy.calculate_delay(1, None);
        let delay2 = policy.calculate_delay(2, None);
        assert!(delay2 > delay1);
        assert_eq!(policy.calculate_delay(0, None), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_bounded_by_row_budget() {
        let policy = RetryPolicy::with_max_retries(2).bounded_by(Duration::from_secs(30));
        assert_eq!(policy.max_delay, Duration::from_secs(15));
        assert_eq!(
            policy.calculate_delay(0, Some(Duration::from_secs(30))),
            Duration::from_secs(15)
        );

        let roomy = RetryPolicy::with_max_retries(2).bounded_by(Duration::from_secs(600));
        assert_eq!(roomy.max_delay, Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "12".parse().unwrap());
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(12)));

        headers.insert("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable_status(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(!is_retryable_status(StatusCode::CONFLICT));
    }
}
