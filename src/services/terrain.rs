use crate::constants::{MAX_ELEVATION_SAMPLES, STREET_VIEW_RADIUS_METERS};
use crate::error::{AppError, Result};
use crate::models::{Coordinates, ElevationProfile, StreetViewAvailability};
use crate::services::provider::ProviderGateway;
use tokio_util::sync::CancellationToken;

/// Elevation and street-level imagery lookups for the map front end
pub struct TerrainService {
    gateway: ProviderGateway,
}

impl TerrainService {
    pub fn new(gateway: ProviderGateway) -> Self {
        TerrainService { gateway }
    }

    /// Elevation profile along a route path, sampled at up to 100 points
    pub async fn elevation_profile(
        &self,
        path: &[Coordinates],
        cancel: &CancellationToken,
    ) -> Result<ElevationProfile> {
        if path.len() < 2 {
            return Err(AppError::InvalidRequest(
                "An elevation profile needs at least 2 path points".to_string(),
            ));
        }

        let samples = elevation_samples(path.len());
        let results = self
            .gateway
            .elevation_along_path(cancel, path, samples)
            .await?;

        tracing::debug!(
            requested = samples,
            received = results.len(),
            "Elevation profile loaded"
        );
        Ok(ElevationProfile::from_samples(results))
    }

    /// Nearest street-level panorama within 50 m of `location`
    pub async fn street_view(
        &self,
        location: &Coordinates,
        cancel: &CancellationToken,
    ) -> Result<StreetViewAvailability> {
        self.gateway
            .street_view(cancel, location, STREET_VIEW_RADIUS_METERS)
            .await
    }
}

fn elevation_samples(path_len: usize) -> usize {
    path_len.min(MAX_ELEVATION_SAMPLES)
}
