use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::modules::data_import::application::ports::InvalidationNotifier;
use crate::modules::data_import::domain::EntitySpec;
use crate::shared::errors::{AppError, AppResult};

const REVALIDATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Asks the web frontend to revalidate an organization's listing view
pub struct HttpInvalidationNotifier {
    client: Client,
    revalidate_url: String,
    api_token: Option<String>,
}

impl HttpInvalidationNotifier {
    pub fn new(revalidate_url: &str, api_token: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(REVALIDATE_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            revalidate_url: revalidate_url.to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl InvalidationNotifier for HttpInvalidationNotifier {
    async fn notify(&self, organization_id: &str, spec: &EntitySpec) -> AppResult<()> {
        let body = json!({
            "organization_id": organization_id,
            "path": spec.listing_path(),
            "entity": spec.entity(),
        });

        let mut request = self.client.post(&self.revalidate_url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Revalidation of {} returned {}",
                spec.listing_path(),
                status
            )));
        }

        debug!(
            "Revalidated {} for organization {}",
            spec.listing_path(),
            organization_id
        );
        Ok(())
    }
}

/// Used when no revalidation endpoint is configured
#[derive(Default)]
pub struct LoggingInvalidationNotifier;

#[async_trait]
impl InvalidationNotifier for LoggingInvalidationNotifier {
    async fn notify(&self, organization_id: &str, spec: &EntitySpec) -> AppResult<()> {
        info!(
            "Listing {} changed for organization {}",
            spec.listing_path(),
            organization_id
        );
        Ok(())
    }
}
