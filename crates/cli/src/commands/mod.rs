//! CLI command implementations.

pub mod listings;
pub mod query;

use car_lot_core::{CarId, FileStorage, ListingStore, Storage};

use crate::config::CarLotConfig;
use crate::error::Result;

/// Open the file-backed listing store in the configured data directory.
pub fn open_store(config: &CarLotConfig) -> ListingStore<FileStorage> {
    let store = ListingStore::load(FileStorage::new(&config.data_dir));
    tracing::debug!(count = store.len(), "Opened listing store");
    store
}

/// Parse a listing id argument.
fn parse_id(id: &str) -> Result<CarId> {
    Ok(CarId::parse(id)?)
}

/// Fail the command if the last mutation could not be saved.
fn ensure_persisted<S: Storage>(store: &mut ListingStore<S>) -> Result<()> {
    match store.take_persist_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
