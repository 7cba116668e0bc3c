//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CAR_LOT_DATA_DIR` - Directory holding the listings file (default: `.car-lot`)
//! - `CAR_LOT_MAKE_MATCH` - Make filter mode, `contains` or `exact` (default: contains)
//! - `CAR_LOT_MODEL_MATCH` - Model filter mode, `contains` or `exact` (default: contains)
//! - `CAR_LOT_LOG_FORMAT` - Log output, `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: `car_lot=info,car_lot_core=info`)
//!
//! A `.env` file in the working directory is loaded first if present.

use std::path::PathBuf;

use car_lot_core::{MatchOptions, TextMatch};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".car-lot";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid log format: {s} (expected text or json)")),
        }
    }
}

/// Car Lot CLI configuration.
#[derive(Debug, Clone)]
pub struct CarLotConfig {
    /// Directory holding the listings file
    pub data_dir: PathBuf,
    /// Make/model matching strategy for `list`
    pub match_options: MatchOptions,
    /// Log output format
    pub log_format: LogFormat,
}

impl CarLotConfig {
    /// Load configuration from environment variables.
    ///
    /// `.env` is loaded once by `main` before this runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = get("CAR_LOT_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let match_options = MatchOptions {
            make: parse_or_default::<TextMatch>(&get, "CAR_LOT_MAKE_MATCH")?,
            model: parse_or_default::<TextMatch>(&get, "CAR_LOT_MODEL_MATCH")?,
        };
        let log_format = parse_or_default::<LogFormat>(&get, "CAR_LOT_LOG_FORMAT")?;

        Ok(Self {
            data_dir,
            match_options,
            log_format,
        })
    }
}

/// Log format from the environment, falling back to text on bad values.
///
/// Used before the subscriber exists; the full config load reports the error.
pub fn log_format_from_env() -> LogFormat {
    std::env::var("CAR_LOT_LOG_FORMAT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional variable, using the type's default when unset or blank.
fn parse_or_default<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match get(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e)),
        None => Ok(T::default()),
    }
}
