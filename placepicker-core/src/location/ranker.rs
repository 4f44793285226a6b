//! Great-circle distance ranking of catalog entries.

use thiserror::Error;

use crate::models::{Coordinates, Place};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("Place '{0}' has no coordinates and cannot be ranked")]
    MissingCoordinates(String),
    #[error("Observer coordinate is not a finite number")]
    InvalidObserver,
}

/// Haversine distance between two points, in kilometres.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    // Rounding can push `a` past 1 near antipodes.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// A catalog entry with its distance from the observer.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlace {
    pub place: Place,
    pub distance_km: f64,
}

/// Catalog ordered by ascending distance. Built fresh by every [`rank`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCatalog {
    observer: Coordinates,
    entries: Vec<RankedPlace>,
}

impl RankedCatalog {
    pub fn observer(&self) -> Coordinates {
        self.observer
    }

    pub fn entries(&self) -> &[RankedPlace] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.place.id.as_str()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Place> {
        self.entries
            .iter()
            .map(|e| &e.place)
            .find(|place| place.id == id)
    }

    /// Drops the distances and keeps the order.
    pub fn into_places(self) -> Vec<Place> {
        self.entries.into_iter().map(|e| e.place).collect()
    }
}

impl IntoIterator for RankedCatalog {
    type Item = RankedPlace;
    type IntoIter = std::vec::IntoIter<RankedPlace>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Orders `catalog` by distance from the observer.
///
/// Equal distances keep their catalog order. The input is left untouched.
pub fn rank(
    catalog: &[Place],
    observer_lat: f64,
    observer_lon: f64,
) -> Result<RankedCatalog, RankError> {
    let observer = Coordinates::new(observer_lat, observer_lon);
    if !observer.is_finite() {
        return Err(RankError::InvalidObserver);
    }

    let mut entries = catalog
        .iter()
        .map(|place| {
            let coordinates = place
                .coordinates
                .ok_or_else(|| RankError::MissingCoordinates(place.id.clone()))?;
            Ok(RankedPlace {
                place: place.clone(),
                distance_km: distance_km(observer, coordinates),
            })
        })
        .collect::<Result<Vec<_>, RankError>>()?;

    // sort_by is stable
    entries.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    Ok(RankedCatalog { observer, entries })
}
