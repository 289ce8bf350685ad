pub mod entity_spec;
pub mod row;
pub mod services;

// Re-exports for easy access
pub use entity_spec::{EntityKind, EntitySpec, FieldKind, FieldSpec, Presence};
pub use row::{FieldValue, ImportRow, NormalizedRow};
pub use services::import_components::{
    ConcurrencyCalculator, ImportCoordinator, ImportExecutor, ProgressTracker, ResultAggregator,
    ValidationService,
};
