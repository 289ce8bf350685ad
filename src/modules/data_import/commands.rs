use crate::modules::data_import::{EntityKind, ImportResult, ImportRow, ImportService};
use crate::shared::errors::AppError;
use crate::{log_debug, log_info};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ImportBatchRequest {
    pub organization_id: String,
    pub entity_kind: EntityKind,
    #[serde(default)]
    pub rows: Vec<ImportRow>,
}

/// Command entry point used by the admin console's upload flow.
/// Only a malformed request is an error; row failures live in the result.
pub async fn import_batch(
    request: ImportBatchRequest,
    import_service: &ImportService,
) -> Result<ImportResult, String> {
    let organization_id = request.organization_id.trim();
    if organization_id.is_empty() {
        return Err(AppError::InvalidInput("Organization ID is required".to_string()).to_string());
    }

    log_debug!(
        "import_batch command called with {} {} rows",
        request.rows.len(),
        request.entity_kind
    );

    let spec = request.entity_kind.spec();
    let result = import_service
        .import_batch(organization_id, &spec, request.rows)
        .await;

    log_info!(
        "Import completed - Total: {}, Succeeded: {}, Failed: {}",
        result.total,
        result.succeeded,
        result.failed
    );

    Ok(result)
}

/// JSON-in/JSON-out variant for callers that hold the raw request body
pub async fn import_batch_json(
    body: &str,
    import_service: &ImportService,
) -> Result<serde_json::Value, String> {
    let request: ImportBatchRequest = serde_json::from_str(body)
        .map_err(|e| AppError::from(e).to_string())?;
    let result = import_batch(request, import_service).await?;
    serde_json::to_value(result).map_err(|e| AppError::from(e).to_string())
}
