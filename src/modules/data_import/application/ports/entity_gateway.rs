use async_trait::async_trait;
use serde_json::Value;

use crate::shared::errors::AppResult;

/// Port (interface) for the remote entity-creation backend
/// Infrastructure layer implements this over HTTP; tests substitute fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityGateway: Send + Sync {
    /// Create one entity. Any non-2xx response or transport failure is an error.
    async fn create(&self, endpoint_path: &str, payload: &Value) -> AppResult<Value>;
}
