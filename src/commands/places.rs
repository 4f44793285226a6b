//! Catalog listing, nearest first.

use clap::Args;
use serde_json::json;

use placepicker_core::{load_catalog, CatalogError, Coordinates, FixedLocation, LoadedCatalog};

use super::{connect, OutputFormat};
use crate::config::Config;

/// List available places, nearest first
#[derive(Debug, Args)]
pub struct PlacesCommand {
    /// Observer latitude (overrides the configured location)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude (overrides the configured location)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl PlacesCommand {
    pub async fn run(&self, config: &Config) -> Result<(), PlacesError> {
        let engine = connect(config).map_err(|e| PlacesError::Setup(e.to_string()))?;
        let location = FixedLocation::new(self.observer(config));

        let loaded = load_catalog(&engine, &location).await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&catalog_json(&loaded))?);
            }
            OutputFormat::Text => print_catalog(&loaded),
        }

        Ok(())
    }

    fn observer(&self, config: &Config) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => config.location.value,
        }
    }
}

fn print_catalog(loaded: &LoadedCatalog) {
    println!("Available Places");
    println!("================\n");

    let origin = loaded.observer.coordinates();
    if loaded.observer.is_fallback() {
        println!("Sorted by distance from {} (default location)\n", origin);
    } else {
        println!("Sorted by distance from {}\n", origin);
    }

    if loaded.places.is_empty() {
        println!("No places available.");
        return;
    }

    for (i, entry) in loaded.places.entries().iter().enumerate() {
        println!(
            "{:>3}. {:<30} {:>10.1} km  [{}]",
            i + 1,
            entry.place.name,
            entry.distance_km,
            entry.place.id
        );
    }
}

fn catalog_json(loaded: &LoadedCatalog) -> serde_json::Value {
    let origin = loaded.observer.coordinates();
    let places: Vec<_> = loaded
        .places
        .entries()
        .iter()
        .map(|entry| {
            json!({
                "place": entry.place,
                "distance_km": entry.distance_km,
            })
        })
        .collect();

    json!({
        "observer": {
            "lat": origin.latitude,
            "lon": origin.longitude,
            "fallback": loaded.observer.is_fallback(),
        },
        "places": places,
    })
}

/// Errors from the places command
#[derive(Debug)]
pub enum PlacesError {
    Setup(String),
    Catalog(CatalogError),
    Json(serde_json::Error),
}

impl std::fmt::Display for PlacesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacesError::Setup(e) => write!(f, "Could not reach place store: {}", e),
            PlacesError::Catalog(CatalogError::Fetch(e)) => {
                write!(f, "Error fetching places... {}", e.user_message())
            }
            PlacesError::Catalog(e) => write!(f, "{}", e),
            PlacesError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for PlacesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlacesError::Catalog(e) => Some(e),
            PlacesError::Json(e) => Some(e),
            PlacesError::Setup(_) => None,
        }
    }
}

impl From<CatalogError> for PlacesError {
    fn from(e: CatalogError) -> Self {
        PlacesError::Catalog(e)
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(e: serde_json::Error) -> Self {
        PlacesError::Json(e)
    }
}
