pub mod modules;
pub mod shared;

use modules::data_import::{
    infrastructure::{
        ApiClient, HttpEntityGateway, HttpInvalidationNotifier, LoggingInvalidationNotifier,
    },
    EntityGateway, ImportService, InvalidationNotifier,
};
use shared::{AppResult, ImportConfig};
use std::sync::Arc;

/// Wire the HTTP-backed import service from configuration
pub fn build_import_service(config: &ImportConfig) -> AppResult<ImportService> {
    let api_client = Arc::new(ApiClient::from_config(config)?);

    // Cast to trait objects for dependency injection
    let gateway: Arc<dyn EntityGateway> = Arc::new(HttpEntityGateway::new(api_client));
    let notifier: Arc<dyn InvalidationNotifier> = match &config.revalidate_url {
        Some(url) => Arc::new(HttpInvalidationNotifier::new(url, config.api_token.clone())?),
        None => {
            log::warn!("PROPDESK_REVALIDATE_URL not set - listing invalidations will only be logged");
            Arc::new(LoggingInvalidationNotifier)
        }
    };

    Ok(ImportService::new(gateway, notifier, config))
}

/// Load configuration from the environment, initialize logging and build the service
pub fn init() -> AppResult<ImportService> {
    shared::utils::init_logger();
    let config = ImportConfig::from_env()?;
    build_import_service(&config)
}
