//! The listing store: sole owner of the car collection.
//!
//! [`ListingStore`] holds the records in insertion order and is the only
//! place they can be mutated. Every mutating call rewrites the whole
//! collection into one [`Storage`] slot ([`STORE_KEY`]) as
//! `{"cars": [...]}`.
//!
//! Persistence is best-effort. A failed write is logged and kept for the
//! caller to inspect via [`ListingStore::take_persist_error`], but the
//! in-memory change is never rolled back. Loading never fails: a missing,
//! unreadable or malformed slot yields an empty store.

use serde::{Deserialize, Serialize};

use crate::car::{Car, CarPatch, NewCar};
use crate::storage::{Storage, StorageError};
use crate::types::CarId;

/// Storage slot holding the serialized collection.
pub const STORE_KEY: &str = "cars-store";

/// On-disk layout of the slot.
#[derive(Debug, Serialize)]
struct PersistedCars<'a> {
    cars: &'a [Car],
}

#[derive(Debug, Deserialize)]
struct LoadedCars {
    cars: Vec<Car>,
}

/// Why the last persist attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The collection could not be encoded.
    #[error("failed to serialize listings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owner of the car collection, persisting through `S`.
#[derive(Debug)]
pub struct ListingStore<S: Storage> {
    cars: Vec<Car>,
    storage: S,
    persist_error: Option<PersistError>,
}

impl<S: Storage> ListingStore<S> {
    /// Restore the collection from `storage`.
    ///
    /// Degrades to an empty collection (with a warning) when the slot is
    /// missing, unreadable or not in the expected shape.
    pub fn load(storage: S) -> Self {
        let cars = match storage.load(STORE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<LoadedCars>(&raw) {
                Ok(loaded) => loaded.cars,
                Err(e) => {
                    tracing::warn!(error = %e, key = STORE_KEY, "Discarding malformed listings");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = STORE_KEY, "Failed to read listings");
                Vec::new()
            }
        };

        tracing::debug!(count = cars.len(), "Listings loaded");
        Self {
            cars,
            storage,
            persist_error: None,
        }
    }

    /// All listings, in insertion order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Look up a listing by id.
    #[must_use]
    pub fn get(&self, id: &CarId) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == *id)
    }

    /// Number of listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// Returns true if there are no listings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// The persistence backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a listing with a freshly generated id.
    #[allow(clippy::indexing_slicing)] // index of the element pushed here
    pub fn add_car(&mut self, data: NewCar) -> &Car {
        let mut id = CarId::generate();
        while self.get(&id).is_some() {
            id = CarId::generate();
        }

        tracing::debug!(car_id = %id, count = self.cars.len() + 1, "Listing added");
        let index = self.cars.len();
        self.cars.push(Car::from_new(id, data));
        self.persist();

        &self.cars[index]
    }

    /// Shallow-merge `patch` into the listing with `id`.
    ///
    /// Returns the updated listing, or `None` (collection unchanged) when no
    /// listing has that id.
    pub fn update_car(&mut self, id: &CarId, patch: CarPatch) -> Option<&Car> {
        let index = self.cars.iter().position(|car| car.id == *id);
        match index {
            Some(index) => {
                if let Some(car) = self.cars.get_mut(index) {
                    car.apply(patch);
                }
                tracing::debug!(car_id = %id, "Listing updated");
            }
            None => tracing::debug!(car_id = %id, "Update skipped, no such listing"),
        }

        self.persist();
        index.and_then(|index| self.cars.get(index))
    }

    /// Remove the listing with `id`, returning it if it existed.
    pub fn remove_car(&mut self, id: &CarId) -> Option<Car> {
        let removed = self
            .cars
            .iter()
            .position(|car| car.id == *id)
            .map(|index| self.cars.remove(index));

        if removed.is_some() {
            tracing::debug!(car_id = %id, count = self.cars.len(), "Listing removed");
        } else {
            tracing::debug!(car_id = %id, "Remove skipped, no such listing");
        }

        self.persist();
        removed
    }

    /// Remove every listing. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.cars.len();
        self.cars.clear();
        tracing::debug!(removed, "Listings cleared");
        self.persist();
        removed
    }

    /// Take the error from the most recent failed persist, if any.
    ///
    /// A later successful persist clears it.
    pub fn take_persist_error(&mut self) -> Option<PersistError> {
        self.persist_error.take()
    }

    /// Consume the store, returning its backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&PersistedCars { cars: &self.cars })
            .map_err(PersistError::from)
            .and_then(|json| {
                self.storage
                    .save(STORE_KEY, &json)
                    .map_err(PersistError::from)
            });

        match result {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                tracing::warn!(error = %e, key = STORE_KEY, "Failed to persist listings");
                self.persist_error = Some(e);
            }
        }
    }
}
