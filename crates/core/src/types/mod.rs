//! Core value types for Car Lot.
//!
//! This module provides type-safe wrappers for listing identifiers and prices,
//! plus the lenient year parser used for form input.

pub mod id;
pub mod price;

pub use id::{CarId, CarIdError};
pub use price::Price;

/// Parse user-entered text into a model year.
///
/// Returns `None` for empty or non-numeric input. No range check is applied,
/// so `"1"` parses to `Some(1)`.
///
/// ```
/// use car_lot_core::parse_year;
///
/// assert_eq!(parse_year(" 2020 "), Some(2020));
/// assert_eq!(parse_year("twenty"), None);
/// assert_eq!(parse_year(""), None);
/// ```
#[must_use]
pub fn parse_year(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}
