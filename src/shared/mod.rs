// Shared kernel used by every module

pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
pub mod utils; // Logging helpers

pub use config::ImportConfig;
pub use errors::{AppError, AppResult};
