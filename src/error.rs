use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors are `Clone` so a single failure can be handed to every caller
/// sharing one coalesced discovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Maps provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Directions request failed: {0}")]
    Directions(String),

    #[error("No routes found: {0}")]
    TotalDirectionsFailure(String),

    #[error("Places lookup failed: {0}")]
    PlacesLookup(String),

    #[error("Elevation lookup failed: {0}")]
    Elevation(String),

    #[error("Street View lookup failed: {0}")]
    StreetView(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ProviderUnavailable(ref e) => {
                tracing::error!("Maps provider unavailable: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, e.as_str())
            }
            AppError::Directions(ref e) => {
                tracing::warn!("Directions error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::TotalDirectionsFailure(ref e) => {
                tracing::info!("No routes found: {}", e);
                (StatusCode::NOT_FOUND, "No routes found between these locations")
            }
            AppError::PlacesLookup(ref e) => {
                tracing::warn!("Places lookup error: {}", e);
                (StatusCode::BAD_GATEWAY, "Places service error")
            }
            AppError::Elevation(ref e) => {
                tracing::warn!("Elevation error: {}", e);
                (StatusCode::BAD_GATEWAY, "Elevation service error")
            }
            AppError::StreetView(ref e) => {
                tracing::warn!("Street View error: {}", e);
                (StatusCode::BAD_GATEWAY, "Street View service error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::Cancelled => (StatusCode::REQUEST_TIMEOUT, "Request cancelled"),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
