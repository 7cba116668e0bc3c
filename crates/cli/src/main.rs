//! Car Lot CLI - Add, edit and search car listings.
//!
//! # Usage
//!
//! ```bash
//! # Add a listing
//! car-lot add --make Honda --model Civic --year 2020 --price 15000
//!
//! # Search listings
//! car-lot list --make honda --max-price 20000
//!
//! # Show one listing
//! car-lot show 5f0c5c8e-4f0b-4d7e-9a4e-3f1d2a8b9c10
//!
//! # Edit and remove
//! car-lot update <ID> --price 14500 --clear image-url
//! car-lot remove <ID>
//! ```
//!
//! # Commands
//!
//! - `add` / `update` / `remove` / `clear` - Change listings
//! - `list` / `show` / `facets` - Browse listings
//! - `seed` - Add the demonstration listings

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::listings::{ClearField, ListingArgs};
use commands::query::ListArgs;
use config::{CarLotConfig, LogFormat};

#[derive(Parser)]
#[command(name = "car-lot")]
#[command(author, version, about = "Car Lot listing tools")]
struct Cli {
    /// Directory holding the listings file (overrides `CAR_LOT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new listing
    Add(ListingArgs),
    /// Edit fields of an existing listing
    Update {
        /// Listing id
        id: String,

        #[command(flatten)]
        fields: ListingArgs,

        /// Clear a field (repeatable)
        #[arg(long, value_enum)]
        clear: Vec<ClearField>,
    },
    /// Remove a listing
    Remove {
        /// Listing id
        id: String,
    },
    /// List listings, optionally filtered
    List(ListArgs),
    /// Show the details of one listing
    Show {
        /// Listing id
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show known makes, models, years and the price range
    Facets {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Add the demonstration listings
    Seed,
    /// Remove every listing
    Clear,
}

/// Log filter used when `RUST_LOG` is not set: info for this binary and the core crate.
const DEFAULT_LOG_FILTER: &str = concat!(env!("CARGO_CRATE_NAME"), "=info,car_lot_core=info");

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() {
    // Load .env before reading the log format
    let _ = dotenvy::dotenv();
    init_tracing(config::log_format_from_env());

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let mut config = CarLotConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        log_format = ?config.log_format,
        "Configuration loaded"
    );

    let mut store = commands::open_store(&config);

    match cli.command {
        Commands::Add(fields) => commands::listings::add(&mut store, fields),
        Commands::Update { id, fields, clear } => {
            commands::listings::update(&mut store, &id, fields, &clear)
        }
        Commands::Remove { id } => commands::listings::remove(&mut store, &id),
        Commands::Seed => commands::listings::seed(&mut store),
        Commands::Clear => commands::listings::clear(&mut store),
        Commands::List(args) => commands::query::list(&store, args, config.match_options),
        Commands::Show { id, json } => commands::query::show(&store, &id, json),
        Commands::Facets { json } => commands::query::facets(&store, json),
    }
}
