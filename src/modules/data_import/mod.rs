pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access
pub use application::ports::{EntityGateway, InvalidationNotifier};
pub use application::service::ImportService;
pub use domain::{EntityKind, EntitySpec, FieldValue, ImportRow};

// Re-export common types for shorter imports
pub use domain::services::import_components::types::{
    ImportProgress, ImportResult, RowError, RowResult,
};
