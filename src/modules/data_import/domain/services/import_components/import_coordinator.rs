use crate::modules::data_import::application::ports::EntityGateway;
use crate::modules::data_import::domain::{EntitySpec, ImportRow};
use crate::shared::config::ImportConfig;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_info};

use super::concurrency_calculator::ConcurrencyCalculator;
use super::import_executor::ImportExecutor;
use super::progress_tracker::ProgressTracker;
use super::types::{ImportProgress, RowError, RowResult};
use super::validation_service::ValidationService;
use futures::{stream, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Atomic counters for progress tracking without lock contention
#[derive(Default)]
struct ProgressCounts {
    processed: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

/// Drives validation and import for every row of a batch
#[derive(Clone)]
pub struct ImportCoordinator {
    import_executor: ImportExecutor,
    progress_tracker: ProgressTracker,
    concurrency: usize,
}

impl ImportCoordinator {
    pub fn new(gateway: Arc<dyn EntityGateway>, config: &ImportConfig) -> Self {
        Self {
            import_executor: ImportExecutor::new(gateway, config.row_timeout),
            progress_tracker: ProgressTracker::default(),
            concurrency: config.concurrency,
        }
    }

    pub fn with_progress_tracker(mut self, progress_tracker: ProgressTracker) -> Self {
        self.progress_tracker = progress_tracker;
        self
    }

    pub async fn run(
        &self,
        organization_id: &str,
        rows: Vec<ImportRow>,
        spec: &EntitySpec,
    ) -> Vec<RowResult> {
        self.run_with_cancellation(organization_id, rows, spec, &CancellationToken::new())
            .await
    }

    /// Process every row and return exactly one result per row, ordered by
    /// input index. A failing row never stops the rest of the batch.
    ///
    /// Rows are processed by a bounded pool (`concurrency`, 1 = sequential)
    /// and every row yields exactly one result carrying its index; results are
    /// re-sorted by index so completion order never leaks into the output.
    /// Rows not yet started when `cancel` fires are reported as cancelled;
    /// rows already in flight finish normally.
    pub async fn run_with_cancellation(
        &self,
        organization_id: &str,
        rows: Vec<ImportRow>,
        spec: &EntitySpec,
        cancel: &CancellationToken,
    ) -> Vec<RowResult> {
        let timer = TimedOperation::new("import_batch_rows");
        let total = rows.len();
        let batch_id = Uuid::new_v4();
        let concurrency = ConcurrencyCalculator::resolve(self.concurrency, total);

        log_info!(
            "Starting {} import batch {} for {} rows (concurrency {})",
            spec.entity(),
            batch_id,
            total,
            concurrency
        );

        let counts = ProgressCounts::default();
        let progress_tracker = self.progress_tracker.clone().with_batch_config(total);

        let mut results = stream::iter(rows.into_iter().enumerate().map(|(index, row)| {
            let executor = &self.import_executor;
            let counts = &counts;
            let progress_tracker = &progress_tracker;

            async move {
                LogContext::import_progress(index + 1, total, spec.entity());

                let result =
                    Self::process_row(executor, organization_id, spec, index, row, cancel).await;

                if result.ok {
                    counts.succeeded.fetch_add(1, Ordering::Relaxed);
                } else {
                    counts.failed.fetch_add(1, Ordering::Relaxed);
                }
                let processed = counts.processed.fetch_add(1, Ordering::Relaxed) + 1;

                if progress_tracker.is_enabled() && progress_tracker.should_emit(processed, total)
                {
                    progress_tracker.emit_import_progress(ImportProgress {
                        batch_id,
                        entity: spec.entity().to_string(),
                        processed,
                        total,
                        succeeded: counts.succeeded.load(Ordering::Relaxed),
                        failed: counts.failed.load(Ordering::Relaxed),
                    });
                }

                result
            }
        }))
        .buffer_unordered(concurrency)
        .collect::<Vec<RowResult>>()
        .await;

        // Completion order is arbitrary once more than one row is in flight
        results.sort_unstable_by_key(|result| result.index);

        timer.finish_with_info(&format!(
            "batch {}: {} succeeded, {} failed",
            batch_id,
            counts.succeeded.load(Ordering::Relaxed),
            counts.failed.load(Ordering::Relaxed)
        ));

        results
    }

    async fn process_row(
        executor: &ImportExecutor,
        organization_id: &str,
        spec: &EntitySpec,
        index: usize,
        row: ImportRow,
        cancel: &CancellationToken,
    ) -> RowResult {
        if cancel.is_cancelled() {
            return RowResult::failure(index, &RowError::Cancelled);
        }

        let normalized = match ValidationService::validate(&row, spec) {
            Ok(normalized) => normalized,
            Err(e) => {
                log_debug!("Row {} rejected before import: {}", index, e);
                return RowResult::failure(index, &e);
            }
        };

        let outcome = executor.import_row(organization_id, &normalized, spec).await;
        RowResult::from_outcome(index, outcome)
    }
}
