pub mod coalescing;
pub mod scoring;
pub mod text;

use crate::cache::{CacheStats, PhotoSpotCache};
use crate::config::DiscoveryConfig;
use crate::constants::ROUTE_NAMES;
use crate::error::{AppError, Result};
use crate::models::{RouteCandidate, TravelMode};
use crate::services::photo_spots::PhotoSpotAggregator;
use crate::services::provider::{DirectionsRoute, ProviderGateway, TextValue};
use coalescing::RequestCoalescer;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One discovery run: directions per travel mode, photo spots per route,
/// scoring and ranking. Not coalesced; see [`RouteDiscovery`].
pub struct DiscoveryPipeline {
    gateway: ProviderGateway,
    spots: PhotoSpotAggregator,
    config: DiscoveryConfig,
}

impl DiscoveryPipeline {
    pub fn new(gateway: ProviderGateway, cache: Arc<PhotoSpotCache>, config: DiscoveryConfig) -> Self {
        let spots = PhotoSpotAggregator::new(gateway.clone(), cache, config.clone());
        DiscoveryPipeline {
            gateway,
            spots,
            config,
        }
    }

    pub async fn run(
        &self,
        origin: &str,
        destination: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RouteCandidate>> {
        tracing::info!(origin, destination, "Discovering photo routes");

        let requests = TravelMode::DISCOVERY_MODES.iter().map(|&mode| async move {
            let result = self
                .gateway
                .directions(cancel, origin, destination, mode)
                .await;
            (mode, result)
        });
        let responses = join_all(requests).await;

        let mut found = Vec::new();
        let mut failures = Vec::new();
        for (mode, result) in responses {
            match result {
                Ok(routes) => {
                    tracing::debug!(mode = %mode, count = routes.len(), "Directions received");
                    found.extend(
                        routes
                            .into_iter()
                            .enumerate()
                            .map(|(ordinal, route)| (mode, ordinal, route)),
                    );
                }
                Err(e @ AppError::ProviderUnavailable(_)) | Err(e @ AppError::Cancelled) => {
                    return Err(e)
                }
                Err(e) => {
                    tracing::warn!(mode = %mode, error = %e, "Failed to get routes");
                    failures.push(format!("{}: {}", mode, e));
                }
            }
        }

        if failures.len() == TravelMode::DISCOVERY_MODES.len() {
            tracing::error!("Directions failed for every travel mode");
            return Err(AppError::TotalDirectionsFailure(failures.join("; ")));
        }

        let candidates = join_all(
            found
                .into_iter()
                .map(|(mode, ordinal, route)| self.build_candidate(mode, ordinal, route, cancel)),
        )
        .await;

        let mut built = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(candidate) = candidate? {
                built.push(candidate);
            }
        }

        let ranked = rank_candidates(built, self.config.tie_break_threshold);
        tracing::info!(count = ranked.len(), "Photo routes ranked");
        Ok(ranked)
    }

    async fn build_candidate(
        &self,
        mode: TravelMode,
        ordinal: usize,
        route: DirectionsRoute,
        cancel: &CancellationToken,
    ) -> Result<Option<RouteCandidate>> {
        let id = format!("route-{}-{}", mode.name(), ordinal);
        let path = route.path();
        if path.len() < 2 {
            tracing::debug!(id = %id, points = path.len(), "Dropping route without a usable path");
            return Ok(None);
        }

        let photo_spots = self.spots.find_photo_spots(&path, cancel).await?;

        let distance = route.distance();
        let duration = route.duration();
        let breakdown = scoring::score_breakdown(&photo_spots, distance_km(&distance));
        let adjusted_minutes = scoring::adjusted_minutes(
            base_minutes(&duration),
            photo_spots.len(),
            self.config.photo_stop_minutes,
        );

        tracing::debug!(
            id = %id,
            via = %route.summary,
            spots = photo_spots.len(),
            score = breakdown.total(),
            "Route scored"
        );

        Ok(Some(RouteCandidate {
            id,
            name: route_name(ordinal, mode),
            travel_mode: mode,
            distance: distance.text,
            duration: text::format_duration(adjusted_minutes),
            adjusted_minutes,
            base_duration: duration.text,
            photo_score: breakdown.total(),
            score_breakdown: breakdown,
            photo_spots,
            path,
        }))
    }
}

/// Kilometers from the structured meters value, falling back to the text
fn distance_km(distance: &TextValue) -> f64 {
    match distance.value {
        Some(meters) => meters / 1000.0,
        None => text::parse_distance(&distance.text),
    }
}

/// Whole minutes from the structured seconds value, falling back to the text
fn base_minutes(duration: &TextValue) -> u32 {
    match duration.value {
        Some(seconds) => (seconds / 60.0).round().max(0.0) as u32,
        None => text::parse_duration(&duration.text),
    }
}

/// "Scenic Route (Walking)" for the first route of a mode, "Route 6 (Walking)"
/// once the names run out
pub fn route_name(ordinal: usize, mode: TravelMode) -> String {
    let base = ROUTE_NAMES
        .get(ordinal)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Route {}", ordinal + 1));
    format!("{} ({})", base, mode.name())
}

/// Whether `a` belongs before `b`: close scores prefer the shorter trip
fn goes_before(a: &RouteCandidate, b: &RouteCandidate, tie_break_threshold: u8) -> bool {
    if a.photo_score.abs_diff(b.photo_score) < tie_break_threshold {
        a.adjusted_minutes < b.adjusted_minutes
    } else {
        a.photo_score > b.photo_score
    }
}

/// Orders candidates by photo score, with scores closer than
/// `tie_break_threshold` ordered by adjusted duration instead.
///
/// That rule is not transitive, so this is a stable insertion sort rather than
/// `sort_by` (which may panic on inconsistent orderings). The result is
/// deterministic for a given input order.
pub fn rank_candidates(mut candidates: Vec<RouteCandidate>, tie_break_threshold: u8) -> Vec<RouteCandidate> {
    for i in 1..candidates.len() {
        let mut j = i;
        while j > 0 && goes_before(&candidates[j], &candidates[j - 1], tie_break_threshold) {
            candidates.swap(j, j - 1);
            j -= 1;
        }
    }
    candidates
}

/// Coalescing, cancellable front door to the discovery pipeline.
///
/// Concurrent calls for the same trimmed `(origin, destination)` share one
/// pipeline run. The run is cancelled once every caller has gone.
pub struct RouteDiscovery {
    pipeline: Arc<DiscoveryPipeline>,
    cache: Arc<PhotoSpotCache>,
    requests: RequestCoalescer<(String, String), Arc<Vec<RouteCandidate>>>,
}

impl RouteDiscovery {
    pub fn new(gateway: ProviderGateway, config: DiscoveryConfig) -> Self {
        let cache = Arc::new(PhotoSpotCache::new());
        RouteDiscovery {
            pipeline: Arc::new(DiscoveryPipeline::new(gateway, cache.clone(), config)),
            cache,
            requests: RequestCoalescer::new(),
        }
    }

    /// Ranked photo routes between two addresses. An empty list means no
    /// route was found.
    pub async fn find_routes(&self, origin: &str, destination: &str) -> Result<Vec<RouteCandidate>> {
        self.find_routes_cancellable(origin, destination, &CancellationToken::new())
            .await
    }

    pub async fn find_routes_cancellable(
        &self,
        origin: &str,
        destination: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<RouteCandidate>> {
        let origin = origin.trim().to_string();
        let destination = destination.trim().to_string();
        let key = (origin.clone(), destination.clone());
        let pipeline = self.pipeline.clone();

        let routes = self
            .requests
            .run(key, cancel, move |token| async move {
                pipeline
                    .run(&origin, &destination, &token)
                    .await
                    .map(Arc::new)
            })
            .await?;

        Ok(routes.as_ref().clone())
    }

    /// Empty the photo-spot cache. Runs already in flight keep the spots they
    /// have loaded.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn in_flight(&self) -> usize {
        self.requests.in_flight()
    }
}
