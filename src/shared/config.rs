use std::env;
use std::time::Duration;

use crate::log_info;
use crate::shared::errors::{AppError, AppResult};

const DEFAULT_API_URL: &str = "http://localhost:8000/v1";
const DEFAULT_ROW_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the import pipeline and its remote collaborators
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Base URL of the backend that owns entity creation
    pub api_base_url: String,
    /// Bearer token forwarded to the backend, if any
    pub api_token: Option<String>,
    /// Endpoint that receives view invalidation signals
    pub revalidate_url: Option<String>,
    /// Max rows in flight at once. 1 keeps processing strictly sequential, 0 means auto.
    pub concurrency: usize,
    pub row_timeout: Duration,
    pub requests_per_second: Option<f64>,
    pub max_retries: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            revalidate_url: None,
            concurrency: 1,
            row_timeout: Duration::from_secs(DEFAULT_ROW_TIMEOUT_SECS),
            requests_per_second: None,
            max_retries: 0,
        }
    }
}

impl ImportConfig {
    /// Load configuration from the process environment (and `.env` when present)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("PROPDESK_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::ConfigError("PROPDESK_API_URL must be set".to_string()))?;

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(AppError::ConfigError(
                "PROPDESK_API_URL must start with http:// or https://".to_string(),
            ));
        }

        let api_token = non_empty(lookup("PROPDESK_API_TOKEN"));
        let revalidate_url = non_empty(lookup("PROPDESK_REVALIDATE_URL"));

        let concurrency: usize = parse_var(&lookup, "IMPORT_CONCURRENCY")?.unwrap_or(1);
        let row_timeout_secs: u64 =
            parse_var(&lookup, "IMPORT_ROW_TIMEOUT_SECS")?.unwrap_or(DEFAULT_ROW_TIMEOUT_SECS);
        if row_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "IMPORT_ROW_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let requests_per_second: Option<f64> = parse_var(&lookup, "IMPORT_REQUESTS_PER_SECOND")?;
        if let Some(rate) = requests_per_second {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(AppError::ConfigError(
                    "IMPORT_REQUESTS_PER_SECOND must be positive".to_string(),
                ));
            }
        }

        let max_retries: u32 = parse_var(&lookup, "IMPORT_MAX_RETRIES")?.unwrap_or(0);

        let config = Self {
            api_base_url,
            api_token,
            revalidate_url,
            concurrency,
            row_timeout: Duration::from_secs(row_timeout_secs),
            requests_per_second,
            max_retries,
        };

        log_info!(
            "Import config loaded: api={}, concurrency={}, row_timeout={:?}, retries={}",
            config.api_base_url,
            config.concurrency,
            config.row_timeout,
            config.max_retries
        );

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::ConfigError(format!("{} is invalid ({}): {}", key, raw, e))),
        None => Ok(None),
    }
}
