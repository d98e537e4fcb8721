pub mod debug;
pub mod photo_routes;
pub mod photos;
pub mod spots;
pub mod terrain;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/photo", post(photo_routes::find_photo_routes))
        .route("/routes/elevation", post(terrain::elevation_profile))
        .route("/spots/{place_id}", get(spots::spot_details))
        .route("/photos/{photo_reference}", get(photos::spot_photo))
        .route("/street-view", get(terrain::street_view))
        .route("/cache", delete(debug::clear_cache))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
