use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::log_info;
use crate::shared::config::ImportConfig;
use crate::shared::utils::logger::LogContext;

use super::super::domain::services::import_components::{
    ImportCoordinator, ImportResult, ProgressTracker, ResultAggregator,
};
use super::super::domain::{EntitySpec, ImportRow};
use super::ports::{EntityGateway, InvalidationNotifier};

/// Import service - batch entry point for every entity kind
///
/// Runs the rows through the coordinator, folds the outcomes into an
/// `ImportResult` and signals dependent views once the batch is done.
/// Never fails: every problem is reported per row.
#[derive(Clone)]
pub struct ImportService {
    coordinator: ImportCoordinator,
    notifier: Arc<dyn InvalidationNotifier>,
}

impl ImportService {
    pub fn new(
        gateway: Arc<dyn EntityGateway>,
        notifier: Arc<dyn InvalidationNotifier>,
        config: &ImportConfig,
    ) -> Self {
        Self {
            coordinator: ImportCoordinator::new(gateway, config),
            notifier,
        }
    }

    pub fn with_progress_tracker(mut self, progress_tracker: ProgressTracker) -> Self {
        self.coordinator = self.coordinator.with_progress_tracker(progress_tracker);
        self
    }

    pub async fn import_batch(
        &self,
        organization_id: &str,
        spec: &EntitySpec,
        rows: Vec<ImportRow>,
    ) -> ImportResult {
        self.import_batch_with_cancellation(organization_id, spec, rows, CancellationToken::new())
            .await
    }

    /// Same as `import_batch`, stopping before any row that has not started
    /// once `cancellation_token` fires. The notifier still runs.
    pub async fn import_batch_with_cancellation(
        &self,
        organization_id: &str,
        spec: &EntitySpec,
        rows: Vec<ImportRow>,
        cancellation_token: CancellationToken,
    ) -> ImportResult {
        let rows = self
            .coordinator
            .run_with_cancellation(organization_id, rows, spec, &cancellation_token)
            .await;
        let result = ResultAggregator::aggregate(rows);

        log_info!(
            "Import of {} rows completed for organization {} - Succeeded: {}, Failed: {}",
            spec.entity(),
            organization_id,
            result.succeeded,
            result.failed
        );

        if let Err(e) = self.notifier.notify(organization_id, spec).await {
            LogContext::error_with_context(
                &e,
                &format!("Failed to invalidate {} listing", spec.listing_path()),
            );
        }

        result
    }

    pub async fn import_properties(
        &self,
        organization_id: &str,
        rows: Vec<ImportRow>,
    ) -> ImportResult {
        self.import_batch(organization_id, &EntitySpec::properties(), rows)
            .await
    }

    pub async fn import_units(&self, organization_id: &str, rows: Vec<ImportRow>) -> ImportResult {
        self.import_batch(organization_id, &EntitySpec::units(), rows)
            .await
    }
}
