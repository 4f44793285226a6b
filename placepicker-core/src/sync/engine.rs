//! Optimistic sync engine for the user's place list.
//!
//! Every edit is split in two steps:
//! 1. [`PlaceSyncEngine::select`] / [`PlaceSyncEngine::remove`] compute the new
//!    list right away and hand it back together with a [`PendingWrite`]
//! 2. [`PendingWrite::commit`] sends the full list to the store and reports
//!    whether the caller has to restore the snapshot taken before the edit
//!
//! The engine never retries and never mutates caller state itself.

use tokio::sync::Mutex;

use super::client::PlaceStore;
use super::error::{EngineError, FetchError, SyncError};
use crate::models::{Place, UserPlaceList};

/// The kind of edit a write belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Select,
    Remove,
}

/// Which failed writes hand back a snapshot to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackPolicy {
    /// Only failed selections are rolled back; a failed removal keeps the
    /// optimistic list.
    #[default]
    SelectOnly,
    /// Every failed write is rolled back.
    Always,
}

impl RollbackPolicy {
    pub fn restores(self, kind: EditKind) -> bool {
        match self {
            RollbackPolicy::SelectOnly => kind == EditKind::Select,
            RollbackPolicy::Always => true,
        }
    }
}

/// Outcome of a remote write.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum SyncResult {
    Ok,
    Failed {
        error: SyncError,
        /// The list as it was before the edit, when the policy asks for a
        /// rollback.
        rollback: Option<UserPlaceList>,
    },
}

impl SyncResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, SyncResult::Ok)
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncResult::Ok => None,
            SyncResult::Failed { error, .. } => Some(error),
        }
    }
}

/// Keeps the user's list consistent with the remote store.
pub struct PlaceSyncEngine<S> {
    store: S,
    policy: RollbackPolicy,
    write_lock: Mutex<()>,
}

impl<S: PlaceStore> PlaceSyncEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: RollbackPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RollbackPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the user's list from the store.
    pub async fn initialize(&self) -> Result<UserPlaceList, FetchError> {
        let places = self
            .store
            .fetch_user_places()
            .await
            .map_err(|source| FetchError {
                resource: "user-places",
                source,
            })?;
        tracing::debug!("Loaded {} user place(s)", places.len());
        Ok(places.into())
    }

    /// Loads the full catalog from the store, unordered.
    pub async fn fetch_catalog(&self) -> Result<Vec<Place>, FetchError> {
        self.store
            .fetch_catalog()
            .await
            .map_err(|source| FetchError {
                resource: "places",
                source,
            })
    }

    /// Puts `place` at the front of `list`.
    ///
    /// A place whose id is already in the list leaves it unchanged and needs no
    /// write.
    pub fn select(&self, list: &UserPlaceList, place: Place) -> Result<Edit<'_, S>, EngineError> {
        if !place.has_id() {
            return Err(EngineError::InvalidPlace);
        }

        if list.contains(&place.id) {
            tracing::debug!("Place {} already selected, nothing to write", place.id);
            return Ok(Edit::unchanged(list));
        }

        Ok(self.edit(EditKind::Select, list, list.prepended(place)))
    }

    /// Drops the entry with `id` from `list`. Absent ids need no write.
    pub fn remove(&self, list: &UserPlaceList, id: &str) -> Edit<'_, S> {
        if !list.contains(id) {
            tracing::debug!("Place {} not in list, nothing to write", id);
            return Edit::unchanged(list);
        }

        self.edit(EditKind::Remove, list, list.without(id))
    }

    fn edit(&self, kind: EditKind, before: &UserPlaceList, after: UserPlaceList) -> Edit<'_, S> {
        Edit {
            list: after.clone(),
            write: Some(PendingWrite {
                engine: self,
                kind,
                places: after,
                snapshot: before.clone(),
            }),
        }
    }

    async fn write(&self, kind: EditKind, places: &UserPlaceList) -> Result<String, SyncError> {
        // One write in flight per engine; later edits queue behind it.
        let _guard = self.write_lock.lock().await;

        tracing::debug!("Writing {} place(s) after {:?}", places.len(), kind);
        self.store
            .put_user_places(places.as_slice())
            .await
            .map_err(SyncError::from)
    }
}

/// The optimistic result of an edit.
#[must_use]
pub struct Edit<'a, S> {
    list: UserPlaceList,
    write: Option<PendingWrite<'a, S>>,
}

impl<'a, S: PlaceStore> Edit<'a, S> {
    fn unchanged(list: &UserPlaceList) -> Self {
        Self {
            list: list.clone(),
            write: None,
        }
    }

    /// The list to show immediately.
    pub fn list(&self) -> &UserPlaceList {
        &self.list
    }

    /// True when the edit changed nothing and no write is pending.
    pub fn is_noop(&self) -> bool {
        self.write.is_none()
    }

    pub fn into_parts(self) -> (UserPlaceList, Option<PendingWrite<'a, S>>) {
        (self.list, self.write)
    }

    /// Commits the pending write, if any, and returns the list the caller
    /// should keep: the optimistic one, or the snapshot after a rollback.
    pub async fn settle(self) -> (UserPlaceList, SyncResult) {
        let Some(write) = self.write else {
            return (self.list, SyncResult::Ok);
        };

        match write.commit().await {
            SyncResult::Failed {
                error,
                rollback: Some(snapshot),
            } => (
                snapshot.clone(),
                SyncResult::Failed {
                    error,
                    rollback: Some(snapshot),
                },
            ),
            result => (self.list, result),
        }
    }
}

/// A full-list write waiting to be sent.
#[must_use]
pub struct PendingWrite<'a, S> {
    engine: &'a PlaceSyncEngine<S>,
    kind: EditKind,
    places: UserPlaceList,
    snapshot: UserPlaceList,
}

impl<S: PlaceStore> PendingWrite<'_, S> {
    pub fn kind(&self) -> EditKind {
        self.kind
    }

    /// The list that will be written.
    pub fn places(&self) -> &UserPlaceList {
        &self.places
    }

    /// The list as it was before the edit.
    pub fn snapshot(&self) -> &UserPlaceList {
        &self.snapshot
    }

    pub async fn commit(self) -> SyncResult {
        match self.engine.write(self.kind, &self.places).await {
            Ok(message) => {
                tracing::debug!("Store accepted write: {}", message);
                SyncResult::Ok
            }
            Err(error) => {
                let restore = self.engine.policy.restores(self.kind);
                tracing::warn!(
                    "Write after {:?} failed ({}), rollback: {}",
                    self.kind,
                    error,
                    restore
                );
                SyncResult::Failed {
                    error,
                    rollback: restore.then_some(self.snapshot),
                }
            }
        }
    }
}
