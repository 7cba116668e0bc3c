//! Identifier type for car listings.
//!
//! A [`CarId`] is assigned once, when a listing is added to the store, and is
//! never reassigned. New ids are random (v4) UUIDs so ids generated by
//! separate processes sharing one storage slot cannot collide.
//!
//! Ids are otherwise opaque: a listing persisted with any other id (for
//! example a numeric timestamp) keeps it, and it is compared verbatim.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`CarId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CarIdError {
    /// The input string is empty.
    #[error("car id cannot be empty")]
    Empty,
}

/// Unique identifier of a car listing.
///
/// ## Examples
///
/// ```
/// use car_lot_core::CarId;
///
/// let id = CarId::generate();
/// let parsed: CarId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
///
/// assert_eq!("1700000000000".parse::<CarId>().unwrap().as_str(), "1700000000000");
/// assert!("  ".parse::<CarId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CarId(String);

impl CarId {
    /// Generate a fresh, random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Get the id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a `CarId` from user input.
    ///
    /// Surrounding whitespace is ignored; any other text is taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`CarIdError::Empty`] for blank input.
    pub fn parse(s: &str) -> Result<Self, CarIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CarIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Persisted ids are strings, or integers in data written by older clients.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for CarId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match StoredId::deserialize(deserializer)? {
            StoredId::Text(text) => Self(text),
            StoredId::Signed(n) => Self(n.to_string()),
            StoredId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CarId {
    type Err = CarIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for CarId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }
}
