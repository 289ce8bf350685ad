pub mod concurrency_calculator;
pub mod import_coordinator;
pub mod import_executor;
pub mod progress_tracker;
pub mod result_aggregator;
pub mod types;
pub mod validation_service;

// Re-export main types for public API
pub use concurrency_calculator::ConcurrencyCalculator;
pub use import_coordinator::ImportCoordinator;
pub use import_executor::ImportExecutor;
pub use progress_tracker::ProgressTracker;
pub use result_aggregator::ResultAggregator;
pub use types::*;
pub use validation_service::ValidationService;
