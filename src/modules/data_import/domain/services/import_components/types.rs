use std::time::Duration;

use thiserror::Error;

/// Why a single row failed. The display text becomes `RowResult::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Missing or malformed field, detected before any remote call
    #[error("{0}")]
    Validation(String),

    /// Transport failure, non-2xx response or malformed response body
    #[error("{0}")]
    Remote(String),

    #[error("Request timed out after {:?}", .0)]
    Timeout(Duration),

    #[error("Import cancelled")]
    Cancelled,
}

impl RowError {
    /// Whether the backend may have seen this row (a side effect may exist).
    /// A timeout also covers rate-limiter and retry waits, so it counts as
    /// possibly reached even when no request left the client.
    pub fn reached_remote(&self) -> bool {
        matches!(self, RowError::Remote(_) | RowError::Timeout(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RowResult {
    pub index: usize,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowResult {
    pub fn success(index: usize) -> Self {
        Self {
            index,
            ok: true,
            error: None,
        }
    }

    pub fn failure(index: usize, error: &RowError) -> Self {
        Self {
            index,
            ok: false,
            error: Some(error.to_string()),
        }
    }

    pub fn from_outcome(index: usize, outcome: Result<(), RowError>) -> Self {
        match outcome {
            Ok(()) => Self::success(index),
            Err(e) => Self::failure(index, &e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rows: Vec<RowResult>,
}

impl ImportResult {
    pub fn failed_rows(&self) -> impl Iterator<Item = &RowResult> {
        self.rows.iter().filter(|r| !r.ok)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImportProgress {
    pub batch_id: uuid::Uuid,
    pub entity: String,
    pub processed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}
