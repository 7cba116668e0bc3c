//! Filtering listings by user criteria.
//!
//! Everything here is a pure function of `(listings, criteria, options)`:
//! nothing is cached and nothing is mutated, so results can simply be
//! recomputed whenever either input changes.
//!
//! # Matching
//!
//! A listing is shown iff it satisfies every specified criterion. Blank text
//! and `None` never exclude anything. A listing missing the field a
//! criterion tests fails that criterion.
//!
//! Text criteria are case-insensitive. Title always uses substring
//! containment; make and model use the [`TextMatch`] chosen in
//! [`MatchOptions`].
//!
//! The price range is compared against the bounds of the *whole* collection
//! ([`PriceBounds::of`]). A range whose supplied ends equal those bounds is
//! treated as "no constraint", which keeps unpriced listings visible while
//! the range sits at its defaults. Once the range differs, only priced
//! listings inside `[min, max]` (inclusive) pass.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::car::Car;
use crate::types::Price;

/// How a text criterion is compared against a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Field contains the criterion as a substring.
    #[default]
    Contains,
    /// Field equals the criterion (e.g. picked from the list of known makes).
    Exact,
}

impl TextMatch {
    /// Case-insensitive comparison of `field` against a (trimmed) `needle`.
    #[must_use]
    pub fn matches(self, field: &str, needle: &str) -> bool {
        let field = field.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            Self::Contains => field.contains(&needle),
            Self::Exact => field.trim() == needle,
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => write!(f, "contains"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for TextMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contains" | "substring" => Ok(Self::Contains),
            "exact" => Ok(Self::Exact),
            _ => Err(format!("invalid match mode: {s} (expected contains or exact)")),
        }
    }
}

/// Matching strategy per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchOptions {
    pub make: TextMatch,
    pub model: TextMatch,
}

/// User-supplied filter constraints. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Criteria {
    pub title: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

/// Lowest and highest price among priced listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min: Price,
    pub max: Price,
}

impl PriceBounds {
    /// Bounds over `cars`, ignoring unpriced listings.
    ///
    /// `None` when no listing has a price, rather than an inverted or
    /// infinite range.
    #[must_use]
    pub fn of(cars: &[Car]) -> Option<Self> {
        let mut prices = cars.iter().filter_map(|car| car.price);
        let first = prices.next()?;
        Some(prices.fold(Self { min: first, max: first }, |bounds, price| Self {
            min: bounds.min.min(price),
            max: bounds.max.max(price),
        }))
    }

    /// Returns true if `price` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Criteria {
    /// Reset every criterion (the "clear filters" action).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true if any criterion would constrain `cars`.
    #[must_use]
    pub fn is_active(&self, cars: &[Car]) -> bool {
        text(self.title.as_ref()).is_some()
            || text(self.make.as_ref()).is_some()
            || text(self.model.as_ref()).is_some()
            || self.year.is_some()
            || self.price_range(PriceBounds::of(cars)).is_some()
    }

    /// The effective price range, or `None` when it does not constrain.
    ///
    /// A supplied end only counts when it differs from the matching end of
    /// `bounds` (or when there are no bounds at all).
    fn price_range(&self, bounds: Option<PriceBounds>) -> Option<(Option<Price>, Option<Price>)> {
        let differs = |supplied: Option<Price>, default: Option<Price>| {
            supplied.is_some_and(|price| Some(price) != default)
        };
        let active = differs(self.min_price, bounds.map(|b| b.min))
            || differs(self.max_price, bounds.map(|b| b.max));
        active.then_some((self.min_price, self.max_price))
    }

    fn matches(
        &self,
        car: &Car,
        options: MatchOptions,
        range: Option<(Option<Price>, Option<Price>)>,
    ) -> bool {
        let text_ok = |criterion: Option<&String>, field: Option<&String>, mode: TextMatch| {
            text(criterion).is_none_or(|needle| field.is_some_and(|value| mode.matches(value, needle)))
        };

        text_ok(self.title.as_ref(), car.title.as_ref(), TextMatch::Contains)
            && text_ok(self.make.as_ref(), car.make.as_ref(), options.make)
            && text_ok(self.model.as_ref(), car.model.as_ref(), options.model)
            && self.year.is_none_or(|year| car.year == Some(year))
            && range.is_none_or(|(min, max)| {
                car.price.is_some_and(|price| {
                    min.is_none_or(|min| min <= price) && max.is_none_or(|max| price <= max)
                })
            })
    }
}

/// Trimmed, non-blank text criterion.
fn text(criterion: Option<&String>) -> Option<&str> {
    criterion.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Listings in `cars` matching `criteria`, in their original order.
#[must_use]
pub fn filter_cars<'a>(cars: &'a [Car], criteria: &Criteria, options: MatchOptions) -> Vec<&'a Car> {
    let range = criteria.price_range(PriceBounds::of(cars));
    cars.iter()
        .filter(|car| criteria.matches(car, options, range))
        .collect()
}

/// Why a filtered view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// There are no listings at all.
    NoListings,
    /// Listings exist but none match.
    NoMatches,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoListings => write!(f, "No cars yet. Add one to get started."),
            Self::NoMatches => write!(f, "No cars match your search criteria."),
        }
    }
}

/// Counts behind the "Showing X of Y cars" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
    pub active: bool,
}

impl FilterSummary {
    /// Summarize a filtered view of `cars`.
    #[must_use]
    pub fn of(cars: &[Car], criteria: &Criteria, options: MatchOptions) -> Self {
        Self::for_matches(cars, criteria, filter_cars(cars, criteria, options).len())
    }

    /// Summarize a view of `cars` already filtered down to `shown` listings.
    #[must_use]
    pub fn for_matches(cars: &[Car], criteria: &Criteria, shown: usize) -> Self {
        Self {
            shown,
            total: cars.len(),
            active: criteria.is_active(cars),
        }
    }

    /// Why nothing is shown, if nothing is.
    #[must_use]
    pub const fn empty_reason(&self) -> Option<EmptyReason> {
        if self.total == 0 {
            Some(EmptyReason::NoListings)
        } else if self.shown == 0 {
            Some(EmptyReason::NoMatches)
        } else {
            None
        }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} cars", self.shown, self.total)
    }
}

/// Option lists for the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    /// Distinct non-blank makes, ascending.
    pub makes: Vec<String>,
    /// Distinct non-blank models, ascending.
    pub models: Vec<String>,
    /// Distinct years, newest first.
    pub years: Vec<i32>,
    pub price_bounds: Option<PriceBounds>,
}

impl Facets {
    /// Collect facets over `cars`.
    #[must_use]
    pub fn of(cars: &[Car]) -> Self {
        let distinct = |field: fn(&Car) -> Option<&String>| -> Vec<String> {
            cars.iter()
                .filter_map(field)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let years: BTreeSet<i32> = cars.iter().filter_map(|car| car.year).collect();

        Self {
            makes: distinct(|car| car.make.as_ref()),
            models: distinct(|car| car.model.as_ref()),
            years: years.into_iter().rev().collect(),
            price_bounds: PriceBounds::of(cars),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::car::NewCar;
    use crate::types::CarId;

    fn car(title: &str, make: &str, model: &str, year: i32, price: Option<i32>) -> Car {
        Car::from_new(
            CarId::generate(),
            NewCar {
                title: Some(title.into()),
                make: Some(make.into()),
                model: Some(model.into()),
                year: Some(year),
                price: price.map(Price::from),
                image_url: None,
            },
        )
    }

    fn lot() -> Vec<Car> {
        vec![
            car("Honda Civic for sale", "Honda", "Civic", 2020, Some(15000)),
            car("Toyota Camry - Excellent Condition", "Toyota", "Camry", 2019, Some(18000)),
            car("BMW 3 Series - Luxury Sedan", "BMW", "3 Series", 2021, Some(35000)),
            car("Ford Mustang - Sports Car", "Ford", "Mustang", 2020, Some(28000)),
        ]
    }

    fn titles<'a>(cars: &[&'a Car]) -> Vec<&'a str> {
        cars.iter().map(|c| c.title.as_deref().unwrap()).collect()
    }

    #[test]
    fn test_default_criteria_returns_everything_in_order() {
        let cars = lot();
        let result = filter_cars(&cars, &Criteria::default(), MatchOptions::default());
        let expected: Vec<&Car> = cars.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_blank_text_is_unspecified() {
        let cars = lot();
        let criteria = Criteria {
            title: Some("   ".into()),
            make: Some(String::new()),
            ..Criteria::default()
        };
        assert_eq!(filter_cars(&cars, &criteria, MatchOptions::default()).len(), 4);
        assert!(!criteria.is_active(&cars));
    }

    #[test]
    fn test_title_substring_case_insensitive() {
        let cars = lot();
        let criteria = Criteria {
            title: Some("SPORTS".into()),
            ..Criteria::default()
        };
        let result = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(titles(&result), ["Ford Mustang - Sports Car"]);
    }

    #[test]
    fn test_make_contains_vs_exact() {
        let cars = lot();
        let criteria = Criteria {
            make: Some("o".into()),
            ..Criteria::default()
        };

        let contains = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(contains.len(), 3);

        let exact = MatchOptions {
            make: TextMatch::Exact,
            ..MatchOptions::default()
        };
        assert!(filter_cars(&cars, &criteria, exact).is_empty());

        let criteria = Criteria {
            make: Some("bmw".into()),
            ..Criteria::default()
        };
        let result = filter_cars(&cars, &criteria, exact);
        assert_eq!(titles(&result), ["BMW 3 Series - Luxury Sedan"]);
    }

    #[test]
    fn test_model_exact_does_not_match_partial() {
        let cars = lot();
        let criteria = Criteria {
            model: Some("Series".into()),
            ..Criteria::default()
        };
        let exact = MatchOptions {
            model: TextMatch::Exact,
            ..MatchOptions::default()
        };
        assert!(filter_cars(&cars, &criteria, exact).is_empty());
        assert_eq!(filter_cars(&cars, &criteria, MatchOptions::default()).len(), 1);
    }

    #[test]
    fn test_year_exact() {
        let cars = lot();
        let criteria = Criteria {
            year: Some(2020),
            ..Criteria::default()
        };
        let result = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(
            titles(&result),
            ["Honda Civic for sale", "Ford Mustang - Sports Car"]
        );
    }

    #[test]
    fn test_price_range_inclusive() {
        let cars = lot();
        let criteria = Criteria {
            min_price: Some(Price::from(18000)),
            max_price: Some(Price::from(28000)),
            ..Criteria::default()
        };
        let result = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(
            titles(&result),
            [
                "Toyota Camry - Excellent Condition",
                "Ford Mustang - Sports Car"
            ]
        );
    }

    #[test]
    fn test_price_range_at_data_bounds_keeps_unpriced() {
        let mut cars = lot();
        cars.push(car("Project car", "Ford", "Model T", 1925, None));

        let criteria = Criteria {
            min_price: Some(Price::from(15000)),
            max_price: Some(Price::from(35000)),
            ..Criteria::default()
        };
        assert_eq!(filter_cars(&cars, &criteria, MatchOptions::default()).len(), 5);
        assert!(!criteria.is_active(&cars));
    }

    #[test]
    fn test_narrowed_price_range_drops_unpriced() {
        let mut cars = lot();
        cars.push(car("Project car", "Ford", "Model T", 1925, None));

        let criteria = Criteria {
            min_price: Some(Price::from(15000)),
            max_price: Some(Price::from(30000)),
            ..Criteria::default()
        };
        let result = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|c| c.price.is_some()));
        assert!(criteria.is_active(&cars));
    }

    #[test]
    fn test_single_sided_range() {
        let cars = lot();
        let criteria = Criteria {
            min_price: Some(Price::from(20000)),
            ..Criteria::default()
        };
        assert_eq!(filter_cars(&cars, &criteria, MatchOptions::default()).len(), 2);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let cars = lot();
        let criteria = Criteria {
            min_price: Some(Price::from(30000)),
            max_price: Some(Price::from(20000)),
            ..Criteria::default()
        };
        assert!(filter_cars(&cars, &criteria, MatchOptions::default()).is_empty());
    }

    #[test]
    fn test_missing_field_fails_criterion() {
        let mut cars = lot();
        cars.push(Car::from_new(CarId::generate(), NewCar::default()));
        let criteria = Criteria {
            make: Some("Honda".into()),
            ..Criteria::default()
        };
        assert_eq!(filter_cars(&cars, &criteria, MatchOptions::default()).len(), 1);
    }

    #[test]
    fn test_criteria_are_anded() {
        let cars = lot();
        let criteria = Criteria {
            make: Some("Ford".into()),
            year: Some(2019),
            ..Criteria::default()
        };
        assert!(filter_cars(&cars, &criteria, MatchOptions::default()).is_empty());
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(PriceBounds::of(&[]), None);
        assert_eq!(
            PriceBounds::of(&[car("x", "y", "z", 2000, None)]),
            None
        );

        let bounds = PriceBounds::of(&lot()).unwrap();
        assert_eq!(bounds.min, Price::from(15000));
        assert_eq!(bounds.max, Price::from(35000));
        assert!(bounds.contains(Price::from(35000)));
        assert!(!bounds.contains(Price::from(35001)));
    }

    #[test]
    fn test_price_filter_on_empty_collection() {
        let criteria = Criteria {
            min_price: Some(Price::from(1)),
            ..Criteria::default()
        };
        assert!(filter_cars(&[], &criteria, MatchOptions::default()).is_empty());
        assert!(criteria.is_active(&[]));
    }

    #[test]
    fn test_clear() {
        let mut criteria = Criteria {
            title: Some("civic".into()),
            year: Some(2020),
            max_price: Some(Price::from(1)),
            ..Criteria::default()
        };
        criteria.clear();
        assert_eq!(criteria, Criteria::default());
    }

    #[test]
    fn test_summary() {
        let cars = lot();
        let criteria = Criteria {
            year: Some(2020),
            ..Criteria::default()
        };
        let summary = FilterSummary::of(&cars, &criteria, MatchOptions::default());
        assert_eq!(summary.to_string(), "Showing 2 of 4 cars");
        assert!(summary.active);
        assert_eq!(summary.empty_reason(), None);

        let matches = filter_cars(&cars, &criteria, MatchOptions::default());
        assert_eq!(FilterSummary::for_matches(&cars, &criteria, matches.len()), summary);

        let none = FilterSummary::of(&[], &Criteria::default(), MatchOptions::default());
        assert_eq!(none.empty_reason(), Some(EmptyReason::NoListings));

        let criteria = Criteria {
            year: Some(1990),
            ..Criteria::default()
        };
        let miss = FilterSummary::of(&cars, &criteria, MatchOptions::default());
        assert_eq!(miss.empty_reason(), Some(EmptyReason::NoMatches));
    }

    #[test]
    fn test_facets() {
        let mut cars = lot();
        cars.push(car("Another Civic", "Honda", "Civic", 2018, None));
        cars.push(Car::from_new(CarId::generate(), NewCar::default()));

        let facets = Facets::of(&cars);
        assert_eq!(facets.makes, ["BMW", "Ford", "Honda", "Toyota"]);
        assert_eq!(facets.models, ["3 Series", "Camry", "Civic", "Mustang"]);
        assert_eq!(facets.years, [2021, 2020, 2019, 2018]);
        assert_eq!(
            facets.price_bounds.map(|b| (b.min, b.max)),
            Some((Price::from(15000), Price::from(35000)))
        );
    }

    #[test]
    fn test_text_match_from_str() {
        assert_eq!("exact".parse::<TextMatch>().unwrap(), TextMatch::Exact);
        assert_eq!(" Contains ".parse::<TextMatch>().unwrap(), TextMatch::Contains);
        assert!("fuzzy".parse::<TextMatch>().is_err());
    }
}
