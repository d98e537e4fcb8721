use crate::error::{AppError, Result};
use crate::models::{PhotoSpot, PlaceDetails};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What the client already knows about the spot, used when the provider
/// lookup fails
#[derive(Debug, Deserialize)]
pub struct SpotQueryParams {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl SpotQueryParams {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidRequest("name must not be empty".to_string()));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(AppError::InvalidRequest(
                    "rating must be between 0 and 5".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// GET /spots/{place_id}?name=&rating=&photo_url=
/// Place details for a photo spot, falling back to what the query carries
pub async fn spot_details(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    Query(params): Query<SpotQueryParams>,
) -> Result<Json<PlaceDetails>> {
    params.validate()?;

    tracing::debug!(place_id = %place_id, name = %params.name, "Spot details request");

    let spot = PhotoSpot {
        id: place_id,
        name: params.name,
        rating: params.rating.unwrap_or(0.0),
        photo_url: params.photo_url.unwrap_or_default(),
        location: None,
        distance: None,
    };

    let details = state
        .place_details
        .details(&spot, &CancellationToken::new())
        .await;
    Ok(Json(details))
}
