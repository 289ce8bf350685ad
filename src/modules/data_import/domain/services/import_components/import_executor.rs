use crate::log_warn;
use crate::modules::data_import::application::ports::EntityGateway;
use crate::modules::data_import::domain::{EntitySpec, NormalizedRow};
use crate::shared::utils::logger::LogContext;

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::types::RowError;

/// Commits one validated row to the backend
#[derive(Clone)]
pub struct ImportExecutor {
    gateway: Arc<dyn EntityGateway>,
    row_timeout: Duration,
}

impl ImportExecutor {
    pub fn new(gateway: Arc<dyn EntityGateway>, row_timeout: Duration) -> Self {
        Self {
            gateway,
            row_timeout,
        }
    }

    /// Issue exactly one create call for the row. Every failure mode comes
    /// back as a `RowError`; nothing is retried here.
    pub async fn import_row(
        &self,
        organization_id: &str,
        row: &NormalizedRow,
        spec: &EntitySpec,
    ) -> Result<(), RowError> {
        let payload = spec.build_payload(row, organization_id);
        let endpoint = spec.endpoint_path();
        let started = Instant::now();

        LogContext::api_call(endpoint, "started", None);

        let outcome =
            tokio::time::timeout(self.row_timeout, self.gateway.create(endpoint, &payload)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(_created)) => {
                LogContext::api_call(endpoint, "succeeded", Some(elapsed_ms));
                Ok(())
            }
            Ok(Err(e)) => {
                log_warn!("Failed to create {} via {}: {}", spec.entity(), endpoint, e);
                Err(RowError::Remote(e.to_string()))
            }
            Err(_) => {
                log_warn!(
                    "Creating {} via {} timed out after {:?}",
                    spec.entity(),
                    endpoint,
                    self.row_timeout
                );
                Err(RowError::Timeout(self.row_timeout))
            }
        }
    }
}
