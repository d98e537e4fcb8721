use crate::error::{AppError, Result};
use crate::models::{Coordinates, ElevationProfile, StreetViewAvailability};
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
pub struct ElevationRequest {
    pub path: Vec<Coordinates>,
}

impl ElevationRequest {
    pub fn validate(&self) -> Result<()> {
        for point in &self.path {
            Coordinates::new(point.lat, point.lng).map_err(AppError::InvalidRequest)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct StreetViewQuery {
    pub lat: f64,
    pub lng: f64,
}

/// POST /routes/elevation
/// Elevation profile along a route path
pub async fn elevation_profile(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ElevationRequest>,
) -> Result<Json<ElevationProfile>> {
    request.validate()?;

    tracing::debug!("Elevation profile request: {} points", request.path.len());

    let profile = state
        .terrain
        .elevation_profile(&request.path, &CancellationToken::new())
        .await?;
    Ok(Json(profile))
}

/// GET /street-view?lat=&lng=
/// Whether street-level imagery exists near a point
pub async fn street_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreetViewQuery>,
) -> Result<Json<StreetViewAvailability>> {
    let location = Coordinates::new(query.lat, query.lng).map_err(AppError::InvalidRequest)?;

    let availability = state
        .terrain
        .street_view(&location, &CancellationToken::new())
        .await?;
    Ok(Json(availability))
}
