use crate::core::catalog::DealCatalog;
use crate::core::distance::within_radius;
use crate::domain::model::{Candidate, Coordinate, DistanceUnit, Match, SearchReport, StoreFailure};
use crate::domain::ports::{Geocoder, PlaceSearch};
use crate::utils::error::{FinderError, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Upper bound the Places text search accepts for its location bias.
pub const MAX_PROVIDER_RADIUS_METERS: f64 = 50_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Concurrent,
}

/// Which in-radius candidate becomes a store's match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First candidate in provider order that is inside the radius.
    #[default]
    FirstInRadius,
    /// Closest candidate inside the radius.
    Nearest,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub unit: DistanceUnit,
    pub mode: ExecutionMode,
    pub max_workers: usize,
    pub policy: MatchPolicy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Miles,
            mode: ExecutionMode::Concurrent,
            max_workers: DEFAULT_MAX_WORKERS,
            policy: MatchPolicy::FirstInRadius,
        }
    }
}

/// Fans a radius search out over every store in the catalog.
pub struct DealFinder<G: Geocoder, P: PlaceSearch> {
    geocoder: G,
    places: P,
    catalog: DealCatalog,
    options: SearchOptions,
}

impl<G: Geocoder, P: PlaceSearch> DealFinder<G, P> {
    pub fn new(geocoder: G, places: P, catalog: DealCatalog, options: SearchOptions) -> Self {
        Self {
            geocoder,
            places,
            catalog,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub async fn find(&self, location: &str, radius: f64) -> SearchReport {
        self.find_with_mode(location, radius, self.options.mode).await
    }

    /// Resolves `location` and searches every store. Never fails: an
    /// unresolvable origin yields an empty report with `origin_error` set.
    pub async fn find_with_mode(
        &self,
        location: &str,
        radius: f64,
        mode: ExecutionMode,
    ) -> SearchReport {
        let started = Instant::now();

        let origin = match self.resolve_origin(location).await {
            Ok(origin) => origin,
            Err(e) => {
                tracing::error!("❌ Error geocoding location '{}': {}", location, e);
                return SearchReport::origin_failed(e.to_string(), started.elapsed());
            }
        };
        tracing::debug!("Resolved '{}' to {}", location, origin);

        let (matches, failures) = self.search_around(origin, radius, mode).await;

        SearchReport {
            origin: Some(origin),
            origin_error: None,
            matches,
            failures,
            elapsed: started.elapsed(),
        }
    }

    async fn resolve_origin(&self, location: &str) -> Result<Coordinate> {
        self.geocoder
            .geocode(location)
            .await?
            .ok_or_else(|| FinderError::LocationNotFound {
                location: location.to_string(),
            })
    }

    /// Searches every catalog store around an already resolved origin.
    /// Matches come back sorted by distance, ties in catalog order.
    pub async fn search_around(
        &self,
        origin: Coordinate,
        radius: f64,
        mode: ExecutionMode,
    ) -> (Vec<Match>, Vec<StoreFailure>) {
        let unit = self.options.unit;
        let radius_meters = unit.to_meters(radius).min(MAX_PROVIDER_RADIUS_METERS);
        let workers = match mode {
            ExecutionMode::Sequential => 1,
            ExecutionMode::Concurrent => self.options.max_workers.max(1),
        };

        tracing::debug!(
            "Searching {} stores within {} {} ({:.0} m hint, {} workers)",
            self.catalog.len(),
            radius,
            unit,
            radius_meters,
            workers
        );

        // Each search yields its own outcome tagged with its catalog index;
        // completion order is arbitrary, so the index restores catalog order.
        let mut outcomes: Vec<(usize, Result<Option<Match>>)> =
            stream::iter(self.catalog.iter().enumerate())
                .map(|(index, (store, deal))| async move {
                    let outcome = self
                        .search_store(store, deal, origin, radius, radius_meters)
                        .await;
                    (index, outcome)
                })
                .buffer_unordered(workers)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut matches = Vec::new();
        let mut failures = Vec::new();
        for ((store, _), (_, outcome)) in self.catalog.iter().zip(outcomes) {
            match outcome {
                Ok(Some(found)) => matches.push(found),
                Ok(None) => {}
                Err(e) => failures.push(StoreFailure {
                    store_name: store.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        // Stable sort keeps catalog order for equal distances.
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        tracing::debug!(
            "Search finished: {} matches, {} failed stores",
            matches.len(),
            failures.len()
        );
        (matches, failures)
    }

    async fn search_store(
        &self,
        store: &str,
        deal: &str,
        origin: Coordinate,
        radius: f64,
        radius_meters: f64,
    ) -> Result<Option<Match>> {
        let candidates = match self.places.search(store, origin, radius_meters).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("⚠️  Error searching for {}: {}", store, e);
                return Err(e);
            }
        };

        let found = select_candidate(candidates, origin, radius, self.options.unit, self.options.policy)
            .map(|(candidate, distance)| {
                Match::from_candidate(store, deal, candidate, distance, self.options.unit)
            });

        match &found {
            Some(m) => tracing::debug!("{}: {} {} away", store, m.distance, m.unit),
            None => tracing::debug!("{}: nothing within {} {}", store, radius, self.options.unit),
        }
        Ok(found)
    }
}

/// Picks the candidate for one store according to `policy`, using exact
/// geodesic distances rather than the provider's own radius filtering.
pub fn select_candidate(
    candidates: Vec<Candidate>,
    origin: Coordinate,
    radius: f64,
    unit: DistanceUnit,
    policy: MatchPolicy,
) -> Option<(Candidate, f64)> {
    let mut in_radius = candidates.into_iter().filter_map(|candidate| {
        within_radius(origin, candidate.location, radius, unit).map(|distance| (candidate, distance))
    });

    match policy {
        MatchPolicy::FirstInRadius => in_radius.next(),
        MatchPolicy::Nearest => in_radius.fold(None, |best, next| match best {
            Some((c, d)) if d <= next.1 => Some((c, d)),
            _ => Some(next),
        }),
    }
}
