use crate::error::{AppError, Result};
use crate::models::route::{PhotoRouteRequest, RouteResponse};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use geojson::FeatureCollection;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RouteFormatParams {
    /// `geojson` for a FeatureCollection of route paths
    #[serde(default)]
    pub format: Option<String>,
}

/// POST /routes/photo
/// Rank photo-worthy routes between two addresses across travel modes.
///
/// Identical concurrent requests share one discovery run. If the client
/// disconnects, axum drops this future and the run is cancelled once no
/// other request is waiting on it.
pub async fn find_photo_routes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RouteFormatParams>,
    Json(request): Json<PhotoRouteRequest>,
) -> Result<Response> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        origin = %request.origin,
        destination = %request.destination,
        "Photo route request: {} -> {}",
        request.origin,
        request.destination
    );

    let routes = state
        .discovery
        .find_routes(&request.origin, &request.destination)
        .await?;

    tracing::info!("Returning {} photo routes", routes.len());

    match params.format.as_deref() {
        None | Some("json") => Ok(Json(RouteResponse { routes }).into_response()),
        Some("geojson") => {
            let collection = FeatureCollection {
                bbox: None,
                features: routes.iter().map(|route| route.to_geojson()).collect(),
                foreign_members: None,
            };
            Ok(Json(collection).into_response())
        }
        Some(other) => Err(AppError::InvalidRequest(format!(
            "Unknown format '{}', expected json or geojson",
            other
        ))),
    }
}
