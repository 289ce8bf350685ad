//! HTTP client for the propdesk backend with optional rate limiting and retries

use super::retry_policy::{is_retryable_error, is_retryable_status, retry_after, RetryPolicy};
use crate::shared::config::ImportConfig;
use crate::shared::errors::{AppError, AppResult};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str = "propdesk-import/0.1";

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    rate_limiter: Option<DefaultDirectRateLimiter>,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        retry_policy: RetryPolicy,
        requests_per_second: Option<f64>,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = requests_per_second
            .map(|rps| Self::create_rate_limiter(rps, 1))
            .transpose()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            rate_limiter,
            retry_policy,
        })
    }

    pub fn from_config(config: &ImportConfig) -> AppResult<Self> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            RetryPolicy::with_max_retries(config.max_retries).bounded_by(config.row_timeout),
            config.requests_per_second,
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(
        requests_per_second: f64,
        burst_size: u32,
    ) -> AppResult<DefaultDirectRateLimiter> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "Invalid request rate: {}",
                requests_per_second
            )));
        }

        let period = Duration::from_secs_f64(1.0 / requests_per_second);
        let burst = NonZeroU32::new(burst_size.max(1))
            .ok_or_else(|| AppError::ConfigError("Burst size must be positive".to_string()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| AppError::ConfigError("Request rate is too high".to_string()))?
            .allow_burst(burst);

        Ok(GovernorRateLimiter::direct(quota))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and return the parsed response (`Null` for empty bodies)
    pub async fn post_json(&self, path: &str, body: &Value) -> AppResult<Value> {
        let url = self.url(path);
        let max_attempts = self.retry_policy.max_retries + 1;

        for attempt in 0..=self.retry_policy.max_retries {
            if let Some(limiter) = &self.rate_limiter {
                limiter.until_ready().await;
            }

            match self.send(&url, body).await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Self::parse_response(response).await;
                    }

                    if is_retryable_status(status) && attempt < self.retry_policy.max_retries {
                        let delay = self
                            .retry_policy
                            .calculate_delay(attempt, retry_after(response.headers()));
                        warn!(
                            "POST {} returned {} (attempt {}/{}). Retrying in {:?}",
                            url,
                            status,
                            attempt + 1,
                            max_attempts,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(Self::status_error(status, &body));
                }
                Err(e) => {
                    if is_retryable_error(&e) && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        warn!(
                            "POST {} failed (attempt {}/{}): {}. Retrying in {:?}",
                            url,
                            attempt + 1,
                            max_attempts,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(AppError::from(e));
                }
            }
        }

        Err(AppError::ExternalServiceError(format!(
            "POST {} failed after {} attempts",
            url, max_attempts
        )))
    }

    async fn send(&self, url: &str, body: &Value) -> Result<Response, reqwest::Error> {
        debug!("POST {}", url);
        let mut request = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(body);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        request.send().await
    }

    async fn parse_response(response: Response) -> AppResult<Value> {
        let text = response.text().await.map_err(|e| {
            AppError::SerializationError(format!("Failed to read backend response: {}", e))
        })?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            AppError::SerializationError(format!(
                "Failed to parse backend response: {}. Response: {}",
                e,
                truncate(&text, 200)
            ))
        })
    }

    /// Map a non-2xx response to an error carrying the backend's own message
    pub fn status_error(status: StatusCode, body: &str) -> AppError {
        let message = extract_error_message(body).unwrap_or_else(|| {
            format!(
                "Backend returned {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        });

        match status.as_u16() {
            429 => AppError::RateLimitError(message),
            404 => AppError::NotFound(message),
            401 | 403 => AppError::Unauthorized(message),
            _ => AppError::ApiError(message),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

/// Pull a human message out of common error body shapes:
/// `{"detail": "..."}`, `{"detail": [{"msg": "..."}]}`, `{"message": "..."}`, `{"error": "..."}`
fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    for key in ["detail", "message", "error"] {
        match json.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return Some(messages.join("; "));
                }
            }
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }

    None
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
