use serde::{Deserialize, Serialize};

use super::Place;

/// The user's picked places, most recently added first.
///
/// Holds owned copies of catalog entries, so later catalog fetches never
/// alter an already-picked place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPlaceList(Vec<Place>);

impl UserPlaceList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|place| place.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Place> {
        self.0.iter().find(|place| place.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|place| place.id.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Place> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with `place` at the front.
    pub(crate) fn prepended(&self, place: Place) -> Self {
        let mut places = Vec::with_capacity(self.0.len() + 1);
        places.push(place);
        places.extend(self.0.iter().cloned());
        Self(places)
    }

    /// Returns a copy without any entry matching `id`.
    pub(crate) fn without(&self, id: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|place| place.id != id)
                .cloned()
                .collect(),
        )
    }
}

impl From<Vec<Place>> for UserPlaceList {
    fn from(places: Vec<Place>) -> Self {
        Self(places)
    }
}

impl From<UserPlaceList> for Vec<Place> {
    fn from(list: UserPlaceList) -> Self {
        list.0
    }
}

impl<'a> IntoIterator for &'a UserPlaceList {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
