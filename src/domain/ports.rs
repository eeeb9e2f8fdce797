use crate::domain::model::{Candidate, Coordinate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Resolves a free-form location to a coordinate. `Ok(None)` means the
/// provider answered but knows no such place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinate>>;
}

/// Text search for places around a center point. The radius is a hint to
/// the provider; callers re-check distances themselves.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<Candidate>>;
}

#[async_trait]
impl<T: Geocoder + ?Sized> Geocoder for std::sync::Arc<T> {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinate>> {
        (**self).geocode(location).await
    }
}

#[async_trait]
impl<T: PlaceSearch + ?Sized> PlaceSearch for std::sync::Arc<T> {
    async fn search(
        &self,
        query: &str,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<Candidate>> {
        (**self).search(query, center, radius_meters).await
    }
}
