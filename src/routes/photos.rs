use crate::constants::{DETAIL_PHOTO_MAX_HEIGHT, DETAIL_PHOTO_MAX_WIDTH, PHOTO_CACHE_MAX_AGE_SECONDS};
use crate::error::Result;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
pub struct PhotoSizeParams {
    #[serde(default = "default_max_width")]
    pub maxwidth: u32,
    #[serde(default = "default_max_height")]
    pub maxheight: u32,
}

fn default_max_width() -> u32 {
    DETAIL_PHOTO_MAX_WIDTH
}

fn default_max_height() -> u32 {
    DETAIL_PHOTO_MAX_HEIGHT
}

/// GET /photos/{photo_reference}?maxwidth=&maxheight=
/// Provider photo fetched server-side, so clients never see the API key
pub async fn spot_photo(
    State(state): State<Arc<AppState>>,
    Path(photo_reference): Path<String>,
    Query(size): Query<PhotoSizeParams>,
) -> Result<Response> {
    let photo = state
        .place_details
        .photo(
            &photo_reference,
            size.maxwidth,
            size.maxheight,
            &CancellationToken::new(),
        )
        .await?;

    tracing::debug!(
        bytes = photo.bytes.len(),
        content_type = %photo.content_type,
        "Serving spot photo"
    );

    Ok((
        [
            (header::CONTENT_TYPE, photo.content_type),
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", PHOTO_CACHE_MAX_AGE_SECONDS),
            ),
        ],
        photo.bytes,
    )
        .into_response())
}
