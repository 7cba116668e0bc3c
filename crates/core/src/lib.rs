//! Car Lot Core - listing store, filtering and persistence.
//!
//! This crate holds the data layer behind the Car Lot tools:
//! - `cli` - Command-line front end (`car-lot`)
//! - `integration-tests` - Cross-module scenarios against real files
//!
//! # Architecture
//!
//! The [`ListingStore`] is the only owner of the listing collection. It
//! exposes add/update/remove plus read accessors and writes the whole
//! collection to an injected [`Storage`] after every mutation. Filtering
//! is a pure function over a borrowed slice of listings, so it can be
//! re-run whenever the collection or the criteria change.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for listing ids and prices
//! - [`car`] - The listing record, new-listing data, patches and form input
//! - [`storage`] - Key-value persistence trait with memory and file backends
//! - [`store`] - The listing store
//! - [`filter`] - Criteria, matching, price bounds, summaries and facets
//! - [`display`] - Titles, specs lines and price labels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod car;
pub mod display;
pub mod filter;
pub mod storage;
pub mod store;
pub mod types;

pub use car::{Car, CarForm, CarPatch, NewCar};
pub use filter::{
    Criteria, EmptyReason, Facets, FilterSummary, MatchOptions, PriceBounds, TextMatch,
    filter_cars,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{ListingStore, PersistError, STORE_KEY};
pub use types::*;

/// The demonstration listings shipped with the original lot.
#[must_use]
pub fn sample_listings() -> Vec<NewCar> {
    let listing = |title: &str, make: &str, model: &str, year: i32, price: i32, image: &str| {
        NewCar {
            title: Some(title.to_owned()),
            make: Some(make.to_owned()),
            model: Some(model.to_owned()),
            year: Some(year),
            price: Some(Price::from(price)),
            image_url: Some(format!(
                "https://images.unsplash.com/{image}?w=400&h=300&fit=crop"
            )),
        }
    };

    vec![
        listing(
            "Honda Civic for sale",
            "Honda",
            "Civic",
            2020,
            15000,
            "photo-1552519507-da3b142c6e3d",
        ),
        listing(
            "Toyota Camry - Excellent Condition",
            "Toyota",
            "Camry",
            2019,
            18000,
            "photo-1621007947382-bb3c3994e3fb",
        ),
        listing(
            "BMW 3 Series - Luxury Sedan",
            "BMW",
            "3 Series",
            2021,
            35000,
            "photo-1555215695-3004980ad54e",
        ),
        listing(
            "Ford Mustang - Sports Car",
            "Ford",
            "Mustang",
            2020,
            28000,
            "photo-1563720223185-11003d516935",
        ),
    ]
}
