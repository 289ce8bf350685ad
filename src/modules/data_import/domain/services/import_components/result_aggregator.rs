use super::types::{ImportResult, RowResult};

/// Folds per-row outcomes into the batch summary
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn aggregate(rows: Vec<RowResult>) -> ImportResult {
        let total = rows.len();
        let succeeded = rows.iter().filter(|r| r.ok).count();

        ImportResult {
            total,
            succeeded,
            failed: total - succeeded,
            rows,
        }
    }
}
