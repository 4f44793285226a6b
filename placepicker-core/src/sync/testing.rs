//! In-memory [`PlaceStore`] for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::client::PlaceStore;
use super::error::RemoteError;
use crate::models::Place;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    WriteStarted(Vec<String>),
    WriteFinished,
}

#[derive(Default)]
pub struct MemoryPlaceStore {
    catalog: Vec<Place>,
    user_places: Mutex<Vec<Place>>,
    events: Mutex<Vec<StoreEvent>>,
    fail_reads: bool,
    /// `Some(detail)` makes every write fail with a 500 carrying `detail`.
    fail_writes: Option<Option<String>>,
    write_delay: Option<Duration>,
}

impl MemoryPlaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Vec<Place>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_user_places(self, places: Vec<Place>) -> Self {
        *self.user_places.lock().unwrap() = places;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self, detail: Option<String>) -> Self {
        self.fail_writes = Some(detail);
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Id sequences of every write the store received, in order.
    pub fn writes(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                StoreEvent::WriteStarted(ids) => Some(ids),
                StoreEvent::WriteFinished => None,
            })
            .collect()
    }

    pub fn user_places_ids(&self) -> Vec<String> {
        self.user_places
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.id.clone())
            .collect()
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn fetch_catalog(&self) -> Result<Vec<Place>, RemoteError> {
        if self.fail_reads {
            return Err(RemoteError::network("connection refused"));
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_user_places(&self) -> Result<Vec<Place>, RemoteError> {
        if self.fail_reads {
            return Err(RemoteError::network("connection refused"));
        }
        Ok(self.user_places.lock().unwrap().clone())
    }

    async fn put_user_places(&self, places: &[Place]) -> Result<String, RemoteError> {
        let ids = places.iter().map(|p| p.id.clone()).collect();
        self.events
            .lock()
            .unwrap()
            .push(StoreEvent::WriteStarted(ids));

        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        self.events.lock().unwrap().push(StoreEvent::WriteFinished);

        if let Some(detail) = &self.fail_writes {
            return Err(RemoteError::rejected(500, detail.clone()));
        }

        *self.user_places.lock().unwrap() = places.to_vec();
        Ok("User places updated!".to_string())
    }
}
