//! Derived display strings for listings.
//!
//! Presentation-neutral: these produce the text a card or details view shows,
//! not any layout.

use std::fmt::Display;

use crate::car::Car;

/// Placeholder for an absent field in the details view.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Specs line shown when make, model and year are all absent.
pub const SPECS_UNAVAILABLE: &str = "Specs unavailable";

/// The listing title, falling back to `"{make} {model}"`.
///
/// May be empty when title, make and model are all absent.
#[must_use]
pub fn display_title(car: &Car) -> String {
    match car.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => format!(
            "{} {}",
            car.make.as_deref().unwrap_or_default(),
            car.model.as_deref().unwrap_or_default()
        )
        .trim()
        .to_owned(),
    }
}

/// Make, model and year joined by spaces, skipping absent parts.
#[must_use]
pub fn specs_line(car: &Car) -> String {
    let parts: Vec<String> = [
        car.make.clone().filter(|s| !s.is_empty()),
        car.model.clone().filter(|s| !s.is_empty()),
        car.year.map(|y| y.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        SPECS_UNAVAILABLE.to_owned()
    } else {
        parts.join(" ")
    }
}

/// The value as text, or [`NOT_SPECIFIED`].
#[must_use]
pub fn field_or_unspecified<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_SPECIFIED.to_owned(), |v| v.to_string())
}

/// `"$15,000"` for a priced listing.
#[must_use]
pub fn price_label(car: &Car) -> Option<String> {
    car.price.map(|price| format!("${price}"))
}
