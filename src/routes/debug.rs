use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let checked_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let mut status = json!({
        "status": "ok",
        "checked_at": checked_at,
        "checks": {}
    });

    // Check maps provider
    match state.gateway.ready().await {
        Ok(()) => {
            status["checks"]["provider"] = json!({
                "name": state.gateway.provider_name(),
                "status": "ok"
            });
        }
        Err(e) => {
            status["checks"]["provider"] = json!({
                "name": state.gateway.provider_name(),
                "error": e.to_string()
            });
            status["status"] = json!("error");
        }
    }

    // Photo spot cache
    status["checks"]["cache"] = json!(state.discovery.cache_stats());
    status["checks"]["in_flight_requests"] = json!(state.discovery.in_flight());

    Json(status)
}

/// DELETE /cache - Empty the photo spot cache
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.discovery.clear_cache();
    StatusCode::NO_CONTENT
}
