//! Integration tests for Car Lot.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p car-lot-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `listing_store` - Store lifecycle against file-backed storage
//! - `filtering` - Filter scenarios over a persisted lot
//!
//! This library only holds shared fixtures.

use car_lot_core::{FileStorage, ListingStore, NewCar, Price};
use tempfile::TempDir;

/// A file-backed store in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn temp_store() -> (TempDir, ListingStore<FileStorage>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = ListingStore::load(FileStorage::new(dir.path()));
    (dir, store)
}

/// Reopen the store persisted in `dir`, as a restarted process would.
#[must_use]
pub fn reopen(dir: &TempDir) -> ListingStore<FileStorage> {
    ListingStore::load(FileStorage::new(dir.path()))
}

/// New-listing data with the commonly filtered fields.
#[must_use]
pub fn listing(make: &str, model: &str, year: i32, price: i32) -> NewCar {
    NewCar {
        make: Some(make.to_owned()),
        model: Some(model.to_owned()),
        year: Some(year),
        price: Some(Price::from(price)),
        ..NewCar::default()
    }
}
