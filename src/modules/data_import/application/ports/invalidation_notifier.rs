use async_trait::async_trait;

use crate::modules::data_import::domain::EntitySpec;
use crate::shared::errors::AppResult;

/// Port (interface) for telling dependent views that an entity listing changed
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvalidationNotifier: Send + Sync {
    /// Signal the listing view of `spec` for one organization
    async fn notify(&self, organization_id: &str, spec: &EntitySpec) -> AppResult<()>;
}
