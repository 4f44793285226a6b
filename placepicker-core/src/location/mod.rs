//! Observer location and distance ranking.

mod ranker;
mod source;

pub use ranker::{distance_km, rank, RankError, RankedCatalog, RankedPlace, EARTH_RADIUS_KM};
pub use source::{
    resolve_observer, DeniedLocation, FixedLocation, LocationError, LocationSource, Observer,
    DEFAULT_LOCATION,
};
