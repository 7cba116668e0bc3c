//! Listing price using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so that inclusive range comparisons and
//! persistence round-trips are exact. No sign or magnitude validation happens
//! here; a negative price is representable and is simply filtered like any
//! other value.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The asking price of a listing, in the lot's single currency.
///
/// Serialized as a decimal string; deserializes from either a JSON number
/// or a numeric string.
///
/// ## Examples
///
/// ```
/// use car_lot_core::Price;
///
/// let price = Price::parse("$15,000").unwrap();
/// assert_eq!(price.to_string(), "15,000");
///
/// assert!(Price::parse("call me").is_none());
/// assert!(Price::parse("").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of fraction digits shown by [`Display`](fmt::Display).
    pub const DISPLAY_SCALE: u32 = 2;

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse user-entered text into a price.
    ///
    /// Leading/trailing whitespace, a leading `$` and `,` group separators
    /// are ignored. Returns `None` for empty or non-numeric input instead of
    /// an error, so a bad field becomes an absent price.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
        let digits: String = unsigned.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() {
            return None;
        }
        Decimal::from_str(&digits).ok().map(Self)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i32> for Price {
    fn from(amount: i32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    /// Formats with `,` group separators and at most two fraction digits,
    /// dropping trailing zeros (`1234.50` renders as `1,234.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(Self::DISPLAY_SCALE).normalize();
        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text.as_str(), None),
        };

        if rounded.is_sign_negative() && !rounded.is_zero() {
            f.write_str("-")?;
        }
        f.write_str(&group_thousands(whole))?;
        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
