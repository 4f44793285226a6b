//! HTTP client for the remote place store.
//!
//! The store is a plain key-value service: the catalog and the user's list
//! are read with `GET`, and the user's list is replaced wholesale with `PUT`.

use std::time::Duration;

use async_trait::async_trait;

use super::error::RemoteError;
use super::protocol::{MessageBody, PlacesBody, PlacesBodyRef, CATALOG_PATH, USER_PLACES_PATH};
use crate::models::Place;

/// Default timeout applied to every request to the store.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote persistence used by the sync engine.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Reads the full catalog.
    async fn fetch_catalog(&self) -> Result<Vec<Place>, RemoteError>;

    /// Reads the user's list as last written.
    async fn fetch_user_places(&self) -> Result<Vec<Place>, RemoteError>;

    /// Replaces the user's list. Returns the store's confirmation message.
    async fn put_user_places(&self, places: &[Place]) -> Result<String, RemoteError>;
}

/// [`PlaceStore`] backed by the store's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPlaceStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPlaceStore {
    /// Creates a store client with the default request timeout.
    pub fn new(server_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(server_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        server_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::network(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(&server_url.into()),
            client,
        })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_places(&self, path: &str) -> Result<Vec<Place>, RemoteError> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::rejected(
                status.as_u16(),
                MessageBody::extract(&body),
            ));
        }

        let body: PlacesBody = response.json().await?;
        Ok(body.places)
    }
}

#[async_trait]
impl PlaceStore for HttpPlaceStore {
    async fn fetch_catalog(&self) -> Result<Vec<Place>, RemoteError> {
        self.get_places(CATALOG_PATH).await
    }

    async fn fetch_user_places(&self) -> Result<Vec<Place>, RemoteError> {
        self.get_places(USER_PLACES_PATH).await
    }

    async fn put_user_places(&self, places: &[Place]) -> Result<String, RemoteError> {
        let url = self.build_url(USER_PLACES_PATH);
        tracing::debug!("PUT {} ({} places)", url, places.len());

        let response = self
            .client
            .put(&url)
            .json(&PlacesBodyRef { places })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RemoteError::rejected(
                status.as_u16(),
                MessageBody::extract(&body),
            ));
        }

        Ok(MessageBody::extract(&body).unwrap_or_default())
    }
}

/// Adds a scheme when missing and drops trailing slashes.
fn normalize_base_url(server_url: &str) -> String {
    let trimmed = server_url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::error::ErrorKind;

    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    #[derive(Clone, Default)]
    struct FakeStore {
        user_places: Arc<Mutex<Vec<Value>>>,
    }

    async fn catalog() -> Json<Value> {
        Json(json!({
            "places": [
                { "id": "p1", "title": "Forest Waterfall", "lat": 44.5588, "lon": -80.344,
                  "image": { "src": "forest-waterfall.jpg", "alt": "A waterfall" } },
                { "id": "p2", "title": "Sahara Desert Dunes", "lat": 25.0, "lon": 0.0 }
            ]
        }))
    }

    async fn get_user_places(State(store): State<FakeStore>) -> Json<Value> {
        let places = store.user_places.lock().unwrap().clone();
        Json(json!({ "places": places }))
    }

    async fn put_user_places(
        State(store): State<FakeStore>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        let places = body["places"].as_array().cloned().unwrap_or_default();
        *store.user_places.lock().unwrap() = places;
        Json(json!({ "message": "User places updated!" }))
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn spawn_store() -> (String, FakeStore) {
        let state = FakeStore::default();
        let router = Router::new()
            .route("/places", get(catalog))
            .route("/user-places", get(get_user_places).put(put_user_places))
            .with_state(state.clone());
        (spawn(router).await, state)
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:3000/"),
            "http://localhost:3000"
        );
        assert_eq!(
            normalize_base_url("https://places.example.com"),
            "https://places.example.com"
        );
        assert_eq!(normalize_base_url("localhost:3000"), "http://localhost:3000");
    }

    #[test]
    fn test_build_url() {
        let store = HttpPlaceStore::new("localhost:3000/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(
            store.build_url(USER_PLACES_PATH),
            "http://localhost:3000/user-places"
        );
    }

    #[tokio::test]
    async fn test_fetch_catalog() {
        let (url, _) = spawn_store().await;
        let store = HttpPlaceStore::new(url).unwrap();

        let places = store.fetch_catalog().await.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Forest Waterfall");
        assert!(places[0].image.is_some());
        assert!(places[1].coordinates.is_some());
    }

    #[tokio::test]
    async fn test_put_then_fetch_user_places() {
        let (url, state) = spawn_store().await;
        let store = HttpPlaceStore::new(url).unwrap();

        let places = vec![
            Place::new("p2", "Sahara Desert Dunes").with_coordinates(25.0, 0.0),
            Place::new("p1", "Forest Waterfall"),
        ];
        let message = store.put_user_places(&places).await.unwrap();
        assert_eq!(message, "User places updated!");

        let stored = state.user_places.lock().unwrap().clone();
        assert_eq!(stored[0]["id"], "p2");
        assert_eq!(stored[0]["title"], "Sahara Desert Dunes");
        assert_eq!(stored[0]["lat"], 25.0);

        let fetched = store.fetch_user_places().await.unwrap();
        assert_eq!(fetched, places);
    }

    #[tokio::test]
    async fn test_rejected_write_carries_message() {
        let router = Router::new().route(
            "/user-places",
            get(|| async { Json(json!({ "places": [] })) }).put(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "message": "Places are missing." })),
                )
            }),
        );
        let store = HttpPlaceStore::new(spawn(router).await).unwrap();

        let err = store.put_user_places(&[]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Rejected { status: 422 });
        assert_eq!(err.detail.as_deref(), Some("Places are missing."));
    }

    #[tokio::test]
    async fn test_rejected_read_without_body() {
        let router = Router::new().route(
            "/places",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let store = HttpPlaceStore::new(spawn(router).await).unwrap();

        let err = store.fetch_catalog().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Rejected { status: 500 });
        assert_eq!(err.detail, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let router = Router::new().route("/places", get(|| async { "not json" }));
        let store = HttpPlaceStore::new(spawn(router).await).unwrap();

        let err = store.fetch_catalog().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = HttpPlaceStore::new(format!("http://{}", addr)).unwrap();
        let err = store.fetch_user_places().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
    }
}
