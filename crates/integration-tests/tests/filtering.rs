//! Integration tests for filtering a persisted lot.

#![allow(clippy::unwrap_used)]

use car_lot_core::{
    CarPatch, Criteria, EmptyReason, Facets, FilterSummary, MatchOptions, Price, TextMatch,
    filter_cars, sample_listings,
};
use car_lot_integration_tests::{listing, reopen, temp_store};

fn price_range(min: i32, max: i32) -> Criteria {
    Criteria {
        min_price: Some(Price::from(min)),
        max_price: Some(Price::from(max)),
        ..Criteria::default()
    }
}

// =============================================================================
// Single Listing Scenario
// =============================================================================

#[test]
fn test_single_honda_scenario() {
    let (dir, mut store) = temp_store();
    let id = store.add_car(listing("Honda", "Civic", 2020, 15000)).id.clone();

    let store = reopen(&dir);
    assert_eq!(store.len(), 1);
    let civic = store.get(&id).unwrap();
    assert_eq!(civic.make.as_deref(), Some("Honda"));
    assert_eq!(civic.model.as_deref(), Some("Civic"));
    assert_eq!(civic.year, Some(2020));
    assert_eq!(civic.price, Some(Price::from(15000)));

    let options = MatchOptions::default();
    let toyota = Criteria {
        make: Some("Toyota".into()),
        ..Criteria::default()
    };
    assert!(filter_cars(store.cars(), &toyota, options).is_empty());

    let inside = filter_cars(store.cars(), &price_range(10000, 20000), options);
    assert_eq!(inside.len(), 1);
    assert_eq!(inside.first().map(|c| &c.id), Some(&id));

    assert!(filter_cars(store.cars(), &price_range(20000, 30000), options).is_empty());
}

// =============================================================================
// Demonstration Lot
// =============================================================================

#[test]
fn test_seeded_lot_queries() {
    let (dir, mut store) = temp_store();
    for data in sample_listings() {
        store.add_car(data);
    }
    store.add_car(listing("Honda", "Accord", 2018, 12000));

    let store = reopen(&dir);
    let cars = store.cars();

    let no_filter = filter_cars(cars, &Criteria::default(), MatchOptions::default());
    assert_eq!(no_filter.len(), cars.len());
    assert!(no_filter.iter().zip(cars).all(|(a, b)| a.id == b.id));

    let hondas = Criteria {
        make: Some("HONDA".into()),
        ..Criteria::default()
    };
    assert_eq!(filter_cars(cars, &hondas, MatchOptions::default()).len(), 2);

    let exact = MatchOptions {
        make: TextMatch::Exact,
        model: TextMatch::Exact,
    };
    let series = Criteria {
        model: Some("series".into()),
        ..Criteria::default()
    };
    assert!(filter_cars(cars, &series, exact).is_empty());
    assert_eq!(filter_cars(cars, &series, MatchOptions::default()).len(), 1);

    let summary = FilterSummary::of(cars, &price_range(12000, 18000), MatchOptions::default());
    assert_eq!(summary.to_string(), "Showing 3 of 5 cars");
    assert!(summary.active);

    let facets = Facets::of(cars);
    assert_eq!(facets.makes, ["BMW", "Ford", "Honda", "Toyota"]);
    assert_eq!(facets.years, [2021, 2020, 2019, 2018]);
    let bounds = facets.price_bounds.unwrap();
    assert_eq!((bounds.min, bounds.max), (Price::from(12000), Price::from(35000)));

    let full_range = price_range(12000, 35000);
    assert!(!full_range.is_active(cars));
}

#[test]
fn test_filters_follow_mutations() {
    let (_dir, mut store) = temp_store();
    let criteria = Criteria {
        year: Some(2020),
        ..Criteria::default()
    };

    let id = store.add_car(listing("Honda", "Civic", 2019, 15000)).id.clone();
    assert!(filter_cars(store.cars(), &criteria, MatchOptions::default()).is_empty());

    store.update_car(&id, CarPatch::new().set_year(2020));
    assert_eq!(filter_cars(store.cars(), &criteria, MatchOptions::default()).len(), 1);

    store.remove_car(&id);
    let summary = FilterSummary::of(store.cars(), &criteria, MatchOptions::default());
    assert_eq!(summary.empty_reason(), Some(EmptyReason::NoListings));
}
