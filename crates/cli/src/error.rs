//! Errors surfaced by CLI commands.

use car_lot_core::{CarId, CarIdError, PersistError};
use thiserror::Error;

use crate::config::ConfigError;

/// Command-level error type for the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A listing id argument could not be parsed.
    #[error("Invalid listing id: {0}")]
    InvalidId(#[from] CarIdError),

    /// The listing exists in memory but could not be saved.
    #[error("Listings were not saved: {0}")]
    Persist(#[from] PersistError),

    /// JSON output could not be produced.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// No listing has the requested id.
    #[error("No listing with id {0}")]
    NotFound(CarId),
}

/// Result type alias for `CliError`.
pub type Result<T> = std::result::Result<T, CliError>;
