//! The car listing record and the shapes used to create and edit it.
//!
//! - [`Car`] - a stored listing, identified by its [`CarId`]
//! - [`NewCar`] - listing fields supplied when adding (no id)
//! - [`CarPatch`] - a shallow, per-field edit of an existing listing
//! - [`CarForm`] - raw text as typed into the add/edit form

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CarId, Price, parse_year};

/// A car listing.
///
/// Every field except `id` is optional and unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Assigned by the store on add; never changes afterwards.
    pub id: CarId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Remote URL or inline `data:` URI of the listing photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Car {
    /// Build a listing from its id and supplied fields.
    #[must_use]
    pub fn from_new(id: CarId, data: NewCar) -> Self {
        Self {
            id,
            title: data.title,
            make: data.make,
            model: data.model,
            year: data.year,
            price: data.price,
            image_url: data.image_url,
        }
    }

    /// Shallow-merge `patch` into this listing.
    ///
    /// Fields present in the patch replace the current value (including
    /// clearing it); untouched fields and the id are left as they are.
    pub fn apply(&mut self, patch: CarPatch) {
        let CarPatch {
            title,
            make,
            model,
            year,
            price,
            image_url,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(make) = make {
            self.make = make;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(year) = year {
            self.year = year;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
    }
}

/// Fields of a listing about to be added.
///
/// There is no `id` field: the store always assigns a fresh one, and an `id`
/// key in deserialized input is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A partial update of a listing.
///
/// Each field is tri-state:
/// - `None` - not part of the patch, left untouched
/// - `Some(None)` - clear the field
/// - `Some(Some(v))` - set the field to `v`
///
/// In JSON, a missing key is untouched and an explicit `null` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarPatch {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub make: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Option<Price>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Generates the `set_*` / `clear_*` builder pair for a patch field.
macro_rules! patch_field {
    ($field:ident, $set:ident, $clear:ident, $ty:ty) => {
        #[doc = concat!("Set `", stringify!($field), "` to `value`.")]
        #[must_use]
        pub fn $set(mut self, value: impl Into<$ty>) -> Self {
            self.$field = Some(Some(value.into()));
            self
        }

        #[doc = concat!("Clear `", stringify!($field), "`.")]
        #[must_use]
        pub fn $clear(mut self) -> Self {
            self.$field = Some(None);
            self
        }
    };
}

impl CarPatch {
    /// An empty patch; applying it changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    patch_field!(title, set_title, clear_title, String);
    patch_field!(make, set_make, clear_make, String);
    patch_field!(model, set_model, clear_model, String);
    patch_field!(year, set_year, clear_year, i32);
    patch_field!(price, set_price, clear_price, Price);
    patch_field!(image_url, set_image_url, clear_image_url, String);

    /// Returns true if the patch touches no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }
}

/// Raw text of the add/edit listing form.
///
/// Converting a form trims every field, treats blank text as absent and
/// parses year and price leniently (non-numeric input becomes absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarForm {
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub price: String,
    pub image_url: String,
}

impl CarForm {
    /// Pre-fill a form from an existing listing.
    #[must_use]
    pub fn from_car(car: &Car) -> Self {
        Self {
            title: car.title.clone().unwrap_or_default(),
            make: car.make.clone().unwrap_or_default(),
            model: car.model.clone().unwrap_or_default(),
            year: car.year.map(|y| y.to_string()).unwrap_or_default(),
            price: car.price.map(|p| p.amount().to_string()).unwrap_or_default(),
            image_url: car.image_url.clone().unwrap_or_default(),
        }
    }

    /// Normalize the form into the fields of a new listing.
    #[must_use]
    pub fn into_new_car(self) -> NewCar {
        NewCar {
            title: non_blank(self.title),
            make: non_blank(self.make),
            model: non_blank(self.model),
            year: parse_year(&self.year),
            price: Price::parse(&self.price),
            image_url: non_blank(self.image_url),
        }
    }

    /// Normalize the form into a patch that replaces every editable field.
    #[must_use]
    pub fn into_patch(self) -> CarPatch {
        let data = self.into_new_car();
        CarPatch {
            title: Some(data.title),
            make: Some(data.make),
            model: Some(data.model),
            year: Some(data.year),
            price: Some(data.price),
            image_url: Some(data.image_url),
        }
    }
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn civic() -> Car {
        Car::from_new(
            CarId::generate(),
            NewCar {
                title: Some("Honda Civic for sale".into()),
                make: Some("Honda".into()),
                model: Some("Civic".into()),
                year: Some(2020),
                price: Some(Price::from(15000)),
                image_url: None,
            },
        )
    }

    #[test]
    fn test_apply_changes_only_patched_fields() {
        let mut car = civic();
        let before = car.clone();

        car.apply(CarPatch::new().set_price(Price::from(14000)));

        assert_eq!(car.id, before.id);
        assert_eq!(car.price, Some(Price::from(14000)));
        assert_eq!(car.title, before.title);
        assert_eq!(car.make, before.make);
        assert_eq!(car.model, before.model);
        assert_eq!(car.year, before.year);
        assert_eq!(car.image_url, before.image_url);
    }

    #[test]
    fn test_apply_clear_field() {
        let mut car = civic();
        car.apply(CarPatch::new().clear_year().set_make("Acura"));
        assert_eq!(car.year, None);
        assert_eq!(car.make.as_deref(), Some("Acura"));
    }

    #[test]
    fn test_apply_empty_patch_is_noop() {
        let mut car = civic();
        let before = car.clone();
        car.apply(CarPatch::new());
        assert_eq!(car, before);
    }

    #[test]
    fn test_patch_json_null_clears_missing_keeps() {
        let patch: CarPatch = serde_json::from_str(r#"{"price": null, "model": "Accord"}"#).unwrap();
        assert_eq!(patch.price, Some(None));
        assert_eq!(patch.model, Some(Some("Accord".into())));
        assert_eq!(patch.title, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_new_car_ignores_id_key() {
        let data: NewCar =
            serde_json::from_str(r#"{"id": "abc", "make": "Honda", "year": 2020}"#).unwrap();
        assert_eq!(data.make.as_deref(), Some("Honda"));
        assert_eq!(data.year, Some(2020));
    }

    #[test]
    fn test_car_json_uses_camel_case_and_omits_absent() {
        let mut car = civic();
        car.image_url = Some("https://example.com/civic.jpg".into());
        car.title = None;

        let value = serde_json::to_value(&car).unwrap();
        assert_eq!(value["imageUrl"], "https://example.com/civic.jpg");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_car_accepts_nulls_and_numeric_price() {
        let id = CarId::generate();
        let json = format!(
            r#"{{"id":"{id}","title":"","make":"Ford","year":null,"price":28000,"imageUrl":null}}"#
        );
        let car: Car = serde_json::from_str(&json).unwrap();
        assert_eq!(car.title.as_deref(), Some(""));
        assert_eq!(car.year, None);
        assert_eq!(car.price, Some(Price::from(28000)));
        assert_eq!(car.image_url, None);
    }

    #[test]
    fn test_form_normalizes_input() {
        let form = CarForm {
            title: "  ".into(),
            make: " Honda ".into(),
            model: "Civic".into(),
            year: "20x0".into(),
            price: "15,000".into(),
            image_url: String::new(),
        };

        let data = form.into_new_car();
        assert_eq!(data.title, None);
        assert_eq!(data.make.as_deref(), Some("Honda"));
        assert_eq!(data.model.as_deref(), Some("Civic"));
        assert_eq!(data.year, None);
        assert_eq!(data.price, Some(Price::from(15000)));
        assert_eq!(data.image_url, None);
    }

    #[test]
    fn test_form_prefill_then_patch_keeps_values() {
        let mut car = civic();
        let before = car.clone();
        car.apply(CarForm::from_car(&before).into_patch());
        assert_eq!(car, before);
    }
}
