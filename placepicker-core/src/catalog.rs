//! Loading the catalog in display order.

use thiserror::Error;

use crate::location::{rank, resolve_observer, LocationSource, Observer, RankError, RankedCatalog};
use crate::sync::{FetchError, PlaceStore, PlaceSyncEngine};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Rank(#[from] RankError),
}

/// A ranked catalog along with the observer it was ranked for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pub observer: Observer,
    pub places: RankedCatalog,
}

/// Fetches the catalog, asks `location` once, and ranks the result.
///
/// A failed fetch ends the load. A failed location lookup does not: the
/// default coordinate is used instead.
pub async fn load_catalog<S, L>(
    engine: &PlaceSyncEngine<S>,
    location: &L,
) -> Result<LoadedCatalog, CatalogError>
where
    S: PlaceStore,
    L: LocationSource + ?Sized,
{
    let catalog = engine.fetch_catalog().await?;
    let observer = resolve_observer(location).await;
    let origin = observer.coordinates();

    let places = rank(&catalog, origin.latitude, origin.longitude)?;
    tracing::debug!(
        "Ranked {} place(s) from {} ({})",
        places.len(),
        origin,
        if observer.is_fallback() { "fallback" } else { "live" }
    );

    Ok(LoadedCatalog { observer, places })
}
