//! Where the observer coordinate comes from.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Coordinates;

/// Used whenever the location source fails.
pub const DEFAULT_LOCATION: Coordinates = Coordinates {
    latitude: 15.78609,
    longitude: 74.5129,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location access denied")]
    Denied,
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// A one-shot request for the observer's position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Yields a configured coordinate, or fails as unavailable when none is set.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self(coordinates)
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.0
            .filter(Coordinates::is_finite)
            .ok_or_else(|| LocationError::Unavailable("no location configured".to_string()))
    }
}

/// A source that always refuses. Handy when the user opted out.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

#[async_trait]
impl LocationSource for DeniedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Denied)
    }
}

/// The coordinate ranking will use, and whether it is live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observer {
    Live(Coordinates),
    Fallback(Coordinates),
}

impl Observer {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Observer::Live(c) | Observer::Fallback(c) => *c,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Observer::Fallback(_))
    }
}

/// Asks `source` once. Any failure resolves to [`DEFAULT_LOCATION`].
pub async fn resolve_observer<L: LocationSource + ?Sized>(source: &L) -> Observer {
    match source.locate().await {
        Ok(coordinates) => Observer::Live(coordinates),
        Err(e) => {
            tracing::warn!("Location error: {}, using default location", e);
            Observer::Fallback(DEFAULT_LOCATION)
        }
    }
}
