//! Commands for the user's own place list.

use clap::{Args, Subcommand};
use serde_json::json;
use std::io::{self, Write};

use placepicker_core::{
    EngineError, FetchError, PickerSession, PlaceStore, SyncError, SyncResult, UserPlaceList,
};

use super::{connect, OutputFormat};
use crate::config::Config;

/// Manage your picked places
#[derive(Debug, Args)]
pub struct MineCommand {
    #[command(subcommand)]
    pub command: MineSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum MineSubcommand {
    /// Show your picked places, most recent first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Pick a place from the catalog
    Add {
        /// Place ID from the catalog
        id: String,
    },
    /// Remove a place from your list
    Remove {
        /// Place ID to remove
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl MineCommand {
    pub async fn run(&self, config: &Config) -> Result<(), MineError> {
        let engine = connect(config).map_err(|e| MineError::Setup(e.to_string()))?;
        let mut session = PickerSession::start(&engine).await?;

        match &self.command {
            MineSubcommand::List { format } => {
                match format {
                    OutputFormat::Json => {
                        let value = json!({ "places": session.places() });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => print_places(session.places()),
                }
                Ok(())
            }
            MineSubcommand::Add { id } => add(&mut session, id).await,
            MineSubcommand::Remove { id, yes } => remove(&mut session, id, *yes).await,
        }
    }
}

async fn add<S: PlaceStore>(session: &mut PickerSession<'_, S>, id: &str) -> Result<(), MineError> {
    if session.places().contains(id) {
        println!("'{}' is already in your places.", id);
        return Ok(());
    }

    // Picked places are independent copies of the catalog entry.
    let catalog = session.engine().fetch_catalog().await?;
    let place = catalog
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| MineError::NotInCatalog(id.to_string()))?;
    let name = place.name.clone();

    let result = session.select(place).await?;
    report(session, result)?;

    println!("✓ Added '{}'", name);
    Ok(())
}

async fn remove<S: PlaceStore>(
    session: &mut PickerSession<'_, S>,
    id: &str,
    yes: bool,
) -> Result<(), MineError> {
    let Some(place) = session.places().get(id).cloned() else {
        println!("'{}' is not in your places.", id);
        return Ok(());
    };

    session.start_remove(id);

    if !yes {
        print!("Remove '{}' from your places? [y/N] ", place.name);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            session.cancel_remove();
            println!("Cancelled.");
            return Ok(());
        }
    }

    let result = session.confirm_remove().await;
    report(session, result)?;

    println!("✓ Removed '{}'", place.name);
    Ok(())
}

/// Shows the list the user ends up with after a failed write. The error
/// itself is returned for the caller to print.
fn report<S: PlaceStore>(
    session: &mut PickerSession<'_, S>,
    result: SyncResult,
) -> Result<(), MineError> {
    match result {
        SyncResult::Ok => Ok(()),
        SyncResult::Failed { error, rollback } => {
            if rollback.is_some() {
                eprintln!("✗ Your list was restored.");
            } else {
                eprintln!("✗ Your list may be out of sync with the store.");
            }
            session.dismiss_error();
            print_places(session.places());
            Err(MineError::Sync(error))
        }
    }
}

fn print_places(places: &UserPlaceList) {
    println!("I'd like to visit ...");
    println!("=====================\n");

    if places.is_empty() {
        println!("Select the places you would like to visit with 'placepicker mine add <id>'.");
        return;
    }

    for place in places {
        println!("  - {:<30} [{}]", place.name, place.id);
    }
}

/// Errors from the mine command
#[derive(Debug)]
pub enum MineError {
    Setup(String),
    Fetch(FetchError),
    Sync(SyncError),
    Engine(EngineError),
    NotInCatalog(String),
    Json(serde_json::Error),
    IoError(io::Error),
}

impl std::fmt::Display for MineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MineError::Setup(e) => write!(f, "Could not reach place store: {}", e),
            MineError::Fetch(e) => write!(f, "{}", e.user_message()),
            MineError::Sync(e) => write!(f, "{}", e),
            MineError::Engine(e) => write!(f, "{}", e),
            MineError::NotInCatalog(id) => write!(f, "Place '{}' is not in the catalog", id),
            MineError::Json(e) => write!(f, "JSON error: {}", e),
            MineError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MineError {}

impl From<FetchError> for MineError {
    fn from(e: FetchError) -> Self {
        MineError::Fetch(e)
    }
}

impl From<EngineError> for MineError {
    fn from(e: EngineError) -> Self {
        MineError::Engine(e)
    }
}

impl From<serde_json::Error> for MineError {
    fn from(e: serde_json::Error) -> Self {
        MineError::Json(e)
    }
}

impl From<io::Error> for MineError {
    fn from(e: io::Error) -> Self {
        MineError::IoError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use placepicker_core::{HttpPlaceStore, Place, PlaceSyncEngine};

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        mine: MineCommand,
    }

    #[test]
    fn test_parse_remove_with_yes() {
        let cli = Cli::parse_from(["mine", "remove", "p3", "--yes"]);
        match cli.mine.command {
            MineSubcommand::Remove { id, yes } => {
                assert_eq!(id, "p3");
                assert!(yes);
            }
            _ => panic!("expected remove"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from(["mine", "add", "p1"]);
        assert!(matches!(cli.mine.command, MineSubcommand::Add { ref id } if id == "p1"));
    }

    #[tokio::test]
    async fn test_report_returns_sync_error_once() {
        // Nothing listens on the port, so every write fails.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpPlaceStore::new(format!("http://{}", addr)).unwrap();
        let engine = PlaceSyncEngine::new(store);
        let mut session =
            PickerSession::with_places(&engine, vec![Place::new("p1", "One")].into());

        let result = session.select(Place::new("p2", "Two")).await.unwrap();
        let expected = result.error().cloned().unwrap();

        match report(&mut session, result) {
            Err(MineError::Sync(error)) => {
                assert_eq!(error, expected);
                assert_eq!(MineError::Sync(error).to_string(), expected.message);
            }
            other => panic!("expected sync error, got {:?}", other),
        }
        assert_eq!(session.places().ids(), vec!["p1"]);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_report_ok_is_silent() {
        let store = HttpPlaceStore::new("localhost:3000").unwrap();
        let engine = PlaceSyncEngine::new(store);
        let mut session = PickerSession::with_places(&engine, UserPlaceList::new());

        assert!(report(&mut session, SyncResult::Ok).is_ok());
    }

    #[test]
    fn test_not_in_catalog_message() {
        let err = MineError::NotInCatalog("p9".to_string());
        assert_eq!(err.to_string(), "Place 'p9' is not in the catalog");
    }
}
