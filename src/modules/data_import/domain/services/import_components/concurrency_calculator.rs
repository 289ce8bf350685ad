use crate::log_info;

/// Resolves how many rows may be in flight against the backend at once
pub struct ConcurrencyCalculator;

impl ConcurrencyCalculator {
    const MIN_AUTO_CONCURRENCY: usize = 2;
    const MAX_CONCURRENCY: usize = 16;
    const CONCURRENCY_PER_CPU: usize = 2;

    /// Auto-size the worker pool from available CPUs
    pub fn calculate_import_concurrency() -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        let optimal = (cpu_count * Self::CONCURRENCY_PER_CPU)
            .max(Self::MIN_AUTO_CONCURRENCY)
            .min(Self::MAX_CONCURRENCY);

        log_info!(
            "Calculated import concurrency: {} (CPUs: {}, multiplier: {}x)",
            optimal,
            cpu_count,
            Self::CONCURRENCY_PER_CPU
        );

        optimal
    }

    /// `requested == 0` selects auto sizing. The result is never below 1 and
    /// never above the number of rows.
    pub fn resolve(requested: usize, total_rows: usize) -> usize {
        let wanted = if requested == 0 {
            Self::calculate_import_concurrency()
        } else {
            requested.min(Self::MAX_CONCURRENCY)
        };

        wanted.min(total_rows).max(1)
    }
}
