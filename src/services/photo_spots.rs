use crate::cache::PhotoSpotCache;
use crate::config::DiscoveryConfig;
use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::photo_spot::placeholder_photo_url;
use crate::models::{Coordinates, PhotoSpot};
use crate::services::provider::{NearbyPlace, NearbySearch, ProviderGateway};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Finds highly rated photo-worthy places along a route path.
///
/// The path is sampled at a handful of evenly spaced points, each point gets a
/// nearby search, and the merged results are deduplicated by place id.
/// Searches are cached by location rounded to three decimals (about 110 m).
pub struct PhotoSpotAggregator {
    gateway: ProviderGateway,
    cache: Arc<PhotoSpotCache>,
    config: DiscoveryConfig,
}

impl PhotoSpotAggregator {
    pub fn new(gateway: ProviderGateway, cache: Arc<PhotoSpotCache>, config: DiscoveryConfig) -> Self {
        PhotoSpotAggregator {
            gateway,
            cache,
            config,
        }
    }

    pub async fn find_photo_spots(
        &self,
        path: &[Coordinates],
        cancel: &CancellationToken,
    ) -> Result<Vec<PhotoSpot>> {
        let samples = sample_points(path, &self.config);
        tracing::debug!(
            "Searching photo spots around {} sample points ({} path points)",
            samples.len(),
            path.len()
        );

        let searches = samples
            .iter()
            .map(|point| self.spots_near(point, cancel));
        let results = join_all(searches).await;

        let mut batches = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(spots) => batches.push(spots),
                // A cancelled request has nobody left to answer
                Err(AppError::Cancelled) => return Err(AppError::Cancelled),
                Err(e) => tracing::warn!("Photo spot search failed: {}", e),
            }
        }

        let mut spots = dedupe(batches.iter().flat_map(|batch| batch.iter().cloned()));
        spots.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        Ok(spots)
    }

    /// Cached nearby search around one sample point
    async fn spots_near(
        &self,
        point: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<PhotoSpot>>> {
        let key = point.cache_key(CACHE_KEY_PRECISION);
        loop {
            match self.load_spots(&key, point, cancel).await {
                // Merged with another request's load that was cancelled; ours is still wanted
                Err(AppError::Cancelled) if !cancel.is_cancelled() => continue,
                result => return result,
            }
        }
    }

    async fn load_spots(
        &self,
        key: &str,
        point: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<PhotoSpot>>> {
        self.cache
            .get_or_load(key, || async {
                let request = NearbySearch {
                    location: *point,
                    radius_m: self.config.search_radius_m,
                    place_type: NEARBY_SEARCH_TYPE.to_string(),
                    keywords: PHOTO_SPOT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
                };
                let places = self.gateway.nearby_search(cancel, &request).await?;
                Ok(places
                    .into_iter()
                    .filter_map(|place| to_photo_spot(place, point, self.config.min_rating))
                    .collect())
            })
            .await
    }
}

/// Evenly spaced sample points along a path.
///
/// Count is one per `path_points_per_sample` points, clamped to the configured
/// bounds. Paths no longer than that count are used whole. Bounds that skipped
/// config validation are repaired: at least one sample, and `max >= min`.
pub fn sample_points(path: &[Coordinates], config: &DiscoveryConfig) -> Vec<Coordinates> {
    let min = config.min_sample_points.max(1);
    let max = config.max_sample_points.max(min);
    let count = (path.len() / config.path_points_per_sample.max(1)).clamp(min, max);

    if path.len() <= count {
        return path.to_vec();
    }

    let step = path.len() / count;
    (0..count).map(|i| path[i * step]).collect()
}

/// Keep the first spot seen for each place id, preserving order
pub fn dedupe(spots: impl IntoIterator<Item = PhotoSpot>) -> Vec<PhotoSpot> {
    let mut seen = HashSet::new();
    spots
        .into_iter()
        .filter(|spot| seen.insert(spot.id.clone()))
        .collect()
}

/// Nearby-search hit to photo spot. Places without an id, a name, or a rating
/// of at least `min_rating` are not photo spots.
fn to_photo_spot(place: NearbyPlace, origin: &Coordinates, min_rating: f64) -> Option<PhotoSpot> {
    let rating = place.rating.filter(|r| *r >= min_rating)?;
    let id = place.place_id?;
    let name = place.name?;

    let photo_url = place
        .photo_url
        .unwrap_or_else(|| placeholder_photo_url(&id, SPOT_PHOTO_MAX_WIDTH, SPOT_PHOTO_MAX_HEIGHT));
    let distance = place
        .location
        .map(|location| origin.formatted_distance_to(&location));

    Some(PhotoSpot {
        id,
        name,
        rating,
        photo_url,
        location: place.location,
        distance,
    })
}
