//! Place Picker Core Library
//!
//! Optimistic sync of a user's place list against a remote store, and
//! distance ranking of the place catalog.

pub mod catalog;
pub mod location;
pub mod models;
pub mod sync;

pub use catalog::{load_catalog, CatalogError, LoadedCatalog};
pub use location::{
    rank, resolve_observer, FixedLocation, LocationError, LocationSource, Observer, RankError,
    RankedCatalog, RankedPlace, DEFAULT_LOCATION,
};
pub use models::{Coordinates, Place, PlaceImage, UserPlaceList};
pub use sync::{
    EngineError, ErrorKind, FetchError, HttpPlaceStore, PickerSession, PlaceStore,
    PlaceSyncEngine, RemoteError, RollbackPolicy, SyncError, SyncResult,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
