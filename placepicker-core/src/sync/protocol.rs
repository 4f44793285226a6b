//! JSON bodies exchanged with the place store.
//!
//! - `GET /places` and `GET /user-places` answer with [`PlacesBody`]
//! - `PUT /user-places` sends a [`PlacesBody`] and answers with [`MessageBody`]
//! - error responses may carry a [`MessageBody`] explaining the failure

use serde::{Deserialize, Serialize};

use crate::models::Place;

/// Path of the read-only catalog.
pub const CATALOG_PATH: &str = "/places";
/// Path of the user's list.
pub const USER_PLACES_PATH: &str = "/user-places";

/// `{ "places": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacesBody {
    #[serde(default)]
    pub places: Vec<Place>,
}

/// Borrowing variant used when writing, so a full-list write never clones.
#[derive(Debug, Serialize)]
pub struct PlacesBodyRef<'a> {
    pub places: &'a [Place],
}

/// `{ "message": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageBody {
    /// Extracts a message from an arbitrary response body, if it has one.
    pub fn extract(body: &str) -> Option<String> {
        serde_json::from_str::<MessageBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}
