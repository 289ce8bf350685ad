pub mod http_client;
pub mod http_entity_gateway;
pub mod notifiers;

pub use http_client::{ApiClient, RetryPolicy};
pub use http_entity_gateway::HttpEntityGateway;
pub use notifiers::{HttpInvalidationNotifier, LoggingInvalidationNotifier};
