//! Stateful wrapper a presentation layer holds on to.
//!
//! Owns the current list, the id waiting for removal confirmation and the
//! last write error until it is dismissed.

use super::client::PlaceStore;
use super::engine::{PlaceSyncEngine, SyncResult};
use super::error::{EngineError, FetchError, SyncError};
use crate::models::{Place, UserPlaceList};

pub struct PickerSession<'a, S> {
    engine: &'a PlaceSyncEngine<S>,
    places: UserPlaceList,
    pending_removal: Option<String>,
    error: Option<SyncError>,
}

impl<'a, S: PlaceStore> PickerSession<'a, S> {
    /// Loads the user's list. A failed load leaves no session to work with.
    pub async fn start(engine: &'a PlaceSyncEngine<S>) -> Result<Self, FetchError> {
        let places = engine.initialize().await?;
        Ok(Self::with_places(engine, places))
    }

    pub fn with_places(engine: &'a PlaceSyncEngine<S>, places: UserPlaceList) -> Self {
        Self {
            engine,
            places,
            pending_removal: None,
            error: None,
        }
    }

    pub fn engine(&self) -> &'a PlaceSyncEngine<S> {
        self.engine
    }

    pub fn places(&self) -> &UserPlaceList {
        &self.places
    }

    pub fn pending_removal(&self) -> Option<&str> {
        self.pending_removal.as_deref()
    }

    /// Last failed write, until dismissed.
    pub fn error(&self) -> Option<&SyncError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub async fn select(&mut self, place: Place) -> Result<SyncResult, EngineError> {
        let edit = self.engine.select(&self.places, place)?;
        let (optimistic, write) = edit.into_parts();
        self.places = optimistic;

        let Some(write) = write else {
            return Ok(SyncResult::Ok);
        };
        Ok(self.apply(write.commit().await))
    }

    /// Marks `id` as waiting for confirmation. Replaces any earlier mark.
    pub fn start_remove(&mut self, id: impl Into<String>) {
        self.pending_removal = Some(id.into());
    }

    pub fn cancel_remove(&mut self) {
        self.pending_removal = None;
    }

    /// Removes the marked place. Without a mark this does nothing.
    pub async fn confirm_remove(&mut self) -> SyncResult {
        let Some(id) = self.pending_removal.take() else {
            return SyncResult::Ok;
        };

        let (optimistic, write) = self.engine.remove(&self.places, &id).into_parts();
        self.places = optimistic;

        match write {
            Some(write) => self.apply(write.commit().await),
            None => SyncResult::Ok,
        }
    }

    fn apply(&mut self, result: SyncResult) -> SyncResult {
        if let SyncResult::Failed { error, rollback } = &result {
            if let Some(snapshot) = rollback {
                self.places = snapshot.clone();
            }
            self.error = Some(error.clone());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::engine::RollbackPolicy;
    use crate::sync::testing::MemoryPlaceStore;

    fn place(id: &str) -> Place {
        Place::new(id, id.to_uppercase())
    }

    #[tokio::test]
    async fn test_start_loads_places() {
        let engine =
            PlaceSyncEngine::new(MemoryPlaceStore::new().with_user_places(vec![place("a")]));
        let session = PickerSession::start(&engine).await.unwrap();

        assert_eq!(session.places().ids(), vec!["a"]);
        assert!(session.pending_removal().is_none());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_start_fails_on_fetch_error() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new().failing_reads());
        assert!(PickerSession::start(&engine).await.is_err());
    }

    #[tokio::test]
    async fn test_select_updates_places() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new());
        let mut session = PickerSession::with_places(&engine, UserPlaceList::new());

        assert!(session.select(place("a")).await.unwrap().is_ok());
        assert!(session.select(place("b")).await.unwrap().is_ok());
        assert!(session.select(place("a")).await.unwrap().is_ok());

        assert_eq!(session.places().ids(), vec!["b", "a"]);
        assert_eq!(engine.store().writes().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_select_restores_and_records_error() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new().failing_writes(None));
        let mut session = PickerSession::with_places(&engine, vec![place("a")].into());

        let result = session.select(place("b")).await.unwrap();
        assert!(!result.is_ok());
        assert_eq!(session.places().ids(), vec!["a"]);
        assert!(session.error().is_some());

        session.dismiss_error();
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_confirm_remove_uses_pending_id() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new());
        let mut session =
            PickerSession::with_places(&engine, vec![place("a"), place("b")].into());

        session.start_remove("a");
        assert_eq!(session.pending_removal(), Some("a"));

        assert!(session.confirm_remove().await.is_ok());
        assert_eq!(session.places().ids(), vec!["b"]);
        assert!(session.pending_removal().is_none());
    }

    #[tokio::test]
    async fn test_cancel_remove_keeps_places() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new());
        let mut session = PickerSession::with_places(&engine, vec![place("a")].into());

        session.start_remove("a");
        session.cancel_remove();
        assert!(session.confirm_remove().await.is_ok());

        assert_eq!(session.places().ids(), vec!["a"]);
        assert!(engine.store().writes().is_empty());
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_optimistic_list_by_default() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new().failing_writes(None));
        let mut session =
            PickerSession::with_places(&engine, vec![place("a"), place("b")].into());

        session.start_remove("b");
        let result = session.confirm_remove().await;

        assert!(!result.is_ok());
        assert_eq!(session.places().ids(), vec!["a"]);
        assert!(session.error().is_some());
    }

    #[tokio::test]
    async fn test_failed_remove_restores_with_always_policy() {
        let engine = PlaceSyncEngine::new(MemoryPlaceStore::new().failing_writes(None))
            .with_policy(RollbackPolicy::Always);
        let mut session =
            PickerSession::with_places(&engine, vec![place("a"), place("b")].into());

        session.start_remove("b");
        let _ = session.confirm_remove().await;

        assert_eq!(session.places().ids(), vec!["a", "b"]);
    }
}
