//! Commands that read listings.
//!
//! # Usage
//!
//! ```bash
//! car-lot list --title civic
//! car-lot list --make BMW --make-match exact --json
//! car-lot list --min-price 10000 --max-price 20000
//! car-lot show <ID>
//! car-lot facets
//! ```

use car_lot_core::{
    Car, Criteria, Facets, FilterSummary, ListingStore, MatchOptions, Price, Storage, TextMatch,
    display, filter_cars, parse_year,
};
use clap::Args;

use super::parse_id;
use crate::error::{CliError, Result};
use crate::output;

/// Filter options for `list`.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Title contains this text (case-insensitive)
    #[arg(long)]
    pub title: Option<String>,

    /// Make filter
    #[arg(long)]
    pub make: Option<String>,

    /// Model filter
    #[arg(long)]
    pub model: Option<String>,

    /// Exact model year
    #[arg(long)]
    pub year: Option<String>,

    /// Lowest price (inclusive)
    #[arg(long)]
    pub min_price: Option<String>,

    /// Highest price (inclusive)
    #[arg(long)]
    pub max_price: Option<String>,

    /// How `--make` is matched (overrides `CAR_LOT_MAKE_MATCH`)
    #[arg(long)]
    pub make_match: Option<TextMatch>,

    /// How `--model` is matched (overrides `CAR_LOT_MODEL_MATCH`)
    #[arg(long)]
    pub model_match: Option<TextMatch>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Build criteria, dropping numeric bounds that do not parse.
    pub fn criteria(&self) -> Criteria {
        Criteria {
            title: self.title.clone(),
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year.as_deref().and_then(|y| lenient(y, "year", parse_year)),
            min_price: self
                .min_price
                .as_deref()
                .and_then(|p| lenient(p, "min-price", Price::parse)),
            max_price: self
                .max_price
                .as_deref()
                .and_then(|p| lenient(p, "max-price", Price::parse)),
        }
    }

    /// Configured match options with any flag overrides applied.
    pub fn match_options(&self, configured: MatchOptions) -> MatchOptions {
        MatchOptions {
            make: self.make_match.unwrap_or(configured.make),
            model: self.model_match.unwrap_or(configured.model),
        }
    }
}

/// Parse a numeric filter, ignoring it (with a warning) when it is not a number.
fn lenient<T>(text: &str, flag: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(text);
    if parsed.is_none() && !text.trim().is_empty() {
        tracing::warn!(flag, value = text, "Ignoring non-numeric filter value");
    }
    parsed
}

/// One-line card for a listing.
fn card_line(car: &Car) -> String {
    let title = display::display_title(car);
    let title = if title.is_empty() { "(untitled)".to_owned() } else { title };
    let price = display::price_label(car).unwrap_or_else(|| "-".to_owned());
    format!("{}  {}  |  {}  |  {}", car.id, title, display::specs_line(car), price)
}

/// List listings matching the filter flags.
pub fn list<S: Storage>(store: &ListingStore<S>, args: ListArgs, configured: MatchOptions) -> Result<()> {
    let criteria = args.criteria();
    let options = args.match_options(configured);
    let cars = store.cars();

    let matches = filter_cars(cars, &criteria, options);
    let summary = FilterSummary::for_matches(cars, &criteria, matches.len());
    tracing::debug!(shown = summary.shown, total = summary.total, ?options, "Filtered listings");

    if args.json {
        return output::json(&matches);
    }

    if let Some(reason) = summary.empty_reason() {
        output::line(reason);
        return Ok(());
    }

    for car in matches {
        output::line(card_line(car));
    }
    if summary.active {
        output::line(summary);
    }
    Ok(())
}

/// Print the details of one listing.
pub fn show<S: Storage>(store: &ListingStore<S>, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let car = store
        .get(&id)
        .ok_or_else(|| CliError::NotFound(id.clone()))?;

    if json {
        return output::json(car);
    }

    let title = display::display_title(car);
    output::line(if title.is_empty() { "(untitled)" } else { title.as_str() });
    output::line(format!("  ID:     {}", car.id));
    output::line(format!("  Make:   {}", display::field_or_unspecified(car.make.as_deref())));
    output::line(format!("  Model:  {}", display::field_or_unspecified(car.model.as_deref())));
    output::line(format!("  Year:   {}", display::field_or_unspecified(car.year)));
    if let Some(price) = display::price_label(car) {
        output::line(format!("  Price:  {price}"));
    }
    if let Some(image) = car.image_url.as_deref() {
        output::line(format!("  Image:  {}", abbreviate_data_uri(image)));
    }
    Ok(())
}

/// Inline images are shown by media type only.
fn abbreviate_data_uri(image: &str) -> String {
    match image.strip_prefix("data:") {
        Some(rest) => {
            let media_type = rest.split([';', ',']).next().unwrap_or_default();
            format!("<inline {media_type}, {} bytes>", image.len())
        }
        None => image.to_owned(),
    }
}

/// Print the option lists for filtering.
pub fn facets<S: Storage>(store: &ListingStore<S>, json: bool) -> Result<()> {
    let facets = Facets::of(store.cars());

    if json {
        return output::json(&facets);
    }

    output::line(format!("Makes:  {}", join_or_none(&facets.makes)));
    output::line(format!("Models: {}", join_or_none(&facets.models)));
    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    output::line(format!("Years:  {}", join_or_none(&years)));
    match facets.price_bounds {
        Some(bounds) => output::line(format!("Price:  ${} - ${}", bounds.min, bounds.max)),
        None => output::line("Price:  (none)"),
    }
    Ok(())
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_owned()
    } else {
        values.join(", ")
    }
}
