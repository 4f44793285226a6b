mod config_cmd;
mod mine;
mod places;

use clap::ValueEnum;
use placepicker_core::{HttpPlaceStore, PlaceSyncEngine, RemoteError};

use crate::config::Config;

pub use config_cmd::ConfigCommand;
pub use mine::MineCommand;
pub use places::PlacesCommand;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builds an engine talking to the configured store.
fn connect(config: &Config) -> Result<PlaceSyncEngine<HttpPlaceStore>, RemoteError> {
    let store = HttpPlaceStore::with_timeout(
        config.server_url.value.clone(),
        config.request_timeout(),
    )?;
    tracing::debug!("Using place store at {}", store.base_url());
    Ok(PlaceSyncEngine::new(store).with_policy(config.rollback_policy()))
}
