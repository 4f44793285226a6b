//! Sync module for the user's place list.
//!
//! This module keeps the user's picked places in step with the remote store:
//!
//! ## Flow
//!
//! 1. `initialize` reads the list once with `GET /user-places`
//! 2. `select` / `remove` compute the new list locally (optimistic update)
//! 3. The full list is written with `PUT /user-places`
//! 4. On a failed write the caller gets the error and, depending on the
//!    [`RollbackPolicy`], the list to restore

mod client;
mod engine;
mod error;
mod protocol;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpPlaceStore, PlaceStore, DEFAULT_TIMEOUT};
pub use engine::{Edit, EditKind, PendingWrite, PlaceSyncEngine, RollbackPolicy, SyncResult};
pub use error::{
    EngineError, ErrorKind, FetchError, RemoteError, SyncError, DEFAULT_FETCH_MESSAGE,
    DEFAULT_SYNC_MESSAGE,
};
pub use protocol::{MessageBody, PlacesBody, CATALOG_PATH, USER_PLACES_PATH};
pub use session::PickerSession;
