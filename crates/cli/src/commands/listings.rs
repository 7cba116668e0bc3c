//! Commands that change listings.
//!
//! # Usage
//!
//! ```bash
//! car-lot add --title "Honda Civic for sale" --make Honda --model Civic --year 2020 --price 15000
//! car-lot update <ID> --price 14500 --clear image-url
//! car-lot remove <ID>
//! car-lot seed
//! car-lot clear
//! ```

use car_lot_core::{
    CarForm, CarPatch, ListingStore, Price, Storage, parse_year, sample_listings,
};
use clap::{Args, ValueEnum};

use super::{ensure_persisted, parse_id};
use crate::error::Result;
use crate::output;

/// Listing fields as typed on the command line.
///
/// Values go through the same normalization as the listing form: blank text
/// is absent, and a year or price that is not a number is absent too.
#[derive(Debug, Clone, Default, Args)]
pub struct ListingArgs {
    /// Listing title
    #[arg(long)]
    pub title: Option<String>,

    /// Manufacturer, e.g. Honda
    #[arg(long)]
    pub make: Option<String>,

    /// Model, e.g. Civic
    #[arg(long)]
    pub model: Option<String>,

    /// Model year
    #[arg(long)]
    pub year: Option<String>,

    /// Asking price, e.g. 15000 or "$15,000"
    #[arg(long)]
    pub price: Option<String>,

    /// Photo URL or data URI
    #[arg(long)]
    pub image_url: Option<String>,
}

/// A listing field that `update --clear` can reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearField {
    Title,
    Make,
    Model,
    Year,
    Price,
    ImageUrl,
}

impl ListingArgs {
    fn to_form(&self) -> CarForm {
        CarForm {
            title: self.title.clone().unwrap_or_default(),
            make: self.make.clone().unwrap_or_default(),
            model: self.model.clone().unwrap_or_default(),
            year: self.year.clone().unwrap_or_default(),
            price: self.price.clone().unwrap_or_default(),
            image_url: self.image_url.clone().unwrap_or_default(),
        }
    }

    /// Warn about numeric fields that will be dropped.
    fn warn_unparsed(&self) {
        if let Some(year) = self.year.as_deref().filter(|y| !y.trim().is_empty()) {
            if parse_year(year).is_none() {
                tracing::warn!(value = year, "Year is not a number, leaving it empty");
            }
        }
        if let Some(price) = self.price.as_deref().filter(|p| !p.trim().is_empty()) {
            if Price::parse(price).is_none() {
                tracing::warn!(value = price, "Price is not a number, leaving it empty");
            }
        }
    }

    /// Patch touching only the supplied fields, then clearing `clear`.
    ///
    /// A field that is both supplied and cleared ends up cleared.
    pub fn into_patch(self, clear: &[ClearField]) -> CarPatch {
        let data = self.to_form().into_new_car();
        let supplied = |arg: &Option<String>| arg.is_some();

        let mut patch = CarPatch {
            title: supplied(&self.title).then_some(data.title),
            make: supplied(&self.make).then_some(data.make),
            model: supplied(&self.model).then_some(data.model),
            year: supplied(&self.year).then_some(data.year),
            price: supplied(&self.price).then_some(data.price),
            image_url: supplied(&self.image_url).then_some(data.image_url),
        };

        for field in clear {
            patch = match field {
                ClearField::Title => patch.clear_title(),
                ClearField::Make => patch.clear_make(),
                ClearField::Model => patch.clear_model(),
                ClearField::Year => patch.clear_year(),
                ClearField::Price => patch.clear_price(),
                ClearField::ImageUrl => patch.clear_image_url(),
            };
        }
        patch
    }
}

/// Add a listing and print its id.
pub fn add<S: Storage>(store: &mut ListingStore<S>, fields: ListingArgs) -> Result<()> {
    fields.warn_unparsed();
    let data = fields.to_form().into_new_car();

    let id = store.add_car(data).id.clone();
    ensure_persisted(store)?;

    tracing::info!(car_id = %id, "Listing added");
    output::line(id);
    Ok(())
}

/// Apply the supplied fields and clears to one listing.
pub fn update<S: Storage>(
    store: &mut ListingStore<S>,
    id: &str,
    fields: ListingArgs,
    clear: &[ClearField],
) -> Result<()> {
    let id = parse_id(id)?;
    fields.warn_unparsed();

    let patch = fields.into_patch(clear);
    if patch.is_empty() {
        tracing::warn!(car_id = %id, "Nothing to update, no fields given");
        return Ok(());
    }

    let updated = store.update_car(&id, patch).is_some();
    ensure_persisted(store)?;

    if updated {
        tracing::info!(car_id = %id, "Listing updated");
        output::line(format!("Updated {id}"));
    } else {
        tracing::warn!(car_id = %id, "No listing with this id, nothing updated");
    }
    Ok(())
}

/// Remove one listing.
pub fn remove<S: Storage>(store: &mut ListingStore<S>, id: &str) -> Result<()> {
    let id = parse_id(id)?;

    let removed = store.remove_car(&id).is_some();
    ensure_persisted(store)?;

    if removed {
        tracing::info!(car_id = %id, remaining = store.len(), "Listing removed");
        output::line(format!("Removed {id}"));
    } else {
        tracing::warn!(car_id = %id, "No listing with this id, nothing removed");
    }
    Ok(())
}

/// Add the demonstration listings.
pub fn seed<S: Storage>(store: &mut ListingStore<S>) -> Result<()> {
    let listings = sample_listings();
    let count = listings.len();

    for data in listings {
        let id = store.add_car(data).id.clone();
        ensure_persisted(store)?;
        output::line(id);
    }

    tracing::info!(added = count, total = store.len(), "Seeded demonstration listings");
    Ok(())
}

/// Remove every listing.
pub fn clear<S: Storage>(store: &mut ListingStore<S>) -> Result<()> {
    let removed = store.clear();
    ensure_persisted(store)?;

    tracing::info!(removed, "Listings cleared");
    output::line(format!("Removed {removed} listings"));
    Ok(())
}
