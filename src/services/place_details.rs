use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::photo_spot::placeholder_photo_url;
use crate::models::{DetailsSource, PhotoSpot, PlaceDetails};
use crate::services::provider::{PlaceDetailsResult, PlacePhoto, ProviderGateway};
use tokio_util::sync::CancellationToken;

/// Placeholder images in a fallback record, after the spot's own photo
const FALLBACK_PLACEHOLDER_PHOTOS: usize = 4;

/// Detail lookups for a single photo spot
pub struct PlaceDetailsService {
    gateway: ProviderGateway,
}

impl PlaceDetailsService {
    pub fn new(gateway: ProviderGateway) -> Self {
        PlaceDetailsService { gateway }
    }

    /// Provider details for `spot`, or a fallback record built from the spot
    /// itself when the lookup fails. Never errors.
    pub async fn details(&self, spot: &PhotoSpot, cancel: &CancellationToken) -> PlaceDetails {
        match self.gateway.place_details(cancel, &spot.id).await {
            Ok(result) => from_provider(result, spot),
            Err(e) => {
                tracing::warn!(place_id = %spot.id, error = %e, "Place details failed, using fallback");
                fallback(spot)
            }
        }
    }

    /// Image behind a photo reference handed out in spot and detail photo URLs
    pub async fn photo(
        &self,
        photo_reference: &str,
        max_width: u32,
        max_height: u32,
        cancel: &CancellationToken,
    ) -> Result<PlacePhoto> {
        validate_photo_request(photo_reference, max_width, max_height)?;
        self.gateway
            .place_photo(cancel, photo_reference, max_width, max_height)
            .await
    }
}

fn validate_photo_request(photo_reference: &str, max_width: u32, max_height: u32) -> Result<()> {
    if photo_reference.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "photo reference must not be empty".to_string(),
        ));
    }
    let valid = 1..=MAX_PHOTO_DIMENSION;
    if !valid.contains(&max_width) || !valid.contains(&max_height) {
        return Err(AppError::InvalidRequest(format!(
            "photo size must be between 1 and {} pixels",
            MAX_PHOTO_DIMENSION
        )));
    }
    Ok(())
}

fn from_provider(result: PlaceDetailsResult, spot: &PhotoSpot) -> PlaceDetails {
    let photos = if result.photo_urls.is_empty() {
        fallback_photos(spot)
    } else {
        result.photo_urls
    };
    let hours = if result.weekday_text.is_empty() {
        None
    } else {
        Some(result.weekday_text.join(", "))
    };

    PlaceDetails {
        name: result.name.unwrap_or_else(|| spot.name.clone()),
        rating: result.rating.unwrap_or(spot.rating),
        review_count: result.user_ratings_total.unwrap_or(0),
        category: category_from_types(&result.types).to_string(),
        address: result.formatted_address,
        hours,
        phone: result.phone,
        website: result.website,
        price: result
            .price_level
            .filter(|level| *level > 0)
            .map(|level| "$".repeat(level as usize)),
        photos,
        reviews: result.reviews,
        source: DetailsSource::Provider,
    }
}

/// Record built only from what the spot already carries
pub fn fallback(spot: &PhotoSpot) -> PlaceDetails {
    PlaceDetails {
        name: spot.name.clone(),
        rating: spot.rating,
        review_count: 0,
        category: category_from_name(&spot.name).to_string(),
        address: None,
        hours: None,
        phone: None,
        website: None,
        price: None,
        photos: fallback_photos(spot),
        reviews: Vec::new(),
        source: DetailsSource::Fallback,
    }
}

fn fallback_photos(spot: &PhotoSpot) -> Vec<String> {
    let placeholders = (0..FALLBACK_PLACEHOLDER_PHOTOS).map(|n| {
        placeholder_photo_url(
            &format!("{}-{}", spot.id, n),
            DETAIL_PHOTO_MAX_WIDTH,
            DETAIL_PHOTO_MAX_HEIGHT,
        )
    });

    std::iter::once(spot.photo_url.clone())
        .filter(|url| !url.is_empty())
        .chain(placeholders)
        .collect()
}

/// Display category from provider place types, first matching rule wins
pub fn category_from_types(types: &[String]) -> &'static str {
    let has = |wanted: &[&str]| types.iter().any(|t| wanted.contains(&t.as_str()));

    if has(&["park"]) {
        "Park"
    } else if has(&["museum"]) {
        "Museum"
    } else if has(&["restaurant", "food"]) {
        "Restaurant"
    } else if has(&["art_gallery"]) {
        "Art Gallery"
    } else if has(&["tourist_attraction", "landmark"]) {
        "Landmark"
    } else if has(&["natural_feature"]) {
        "Scenic Spot"
    } else if has(&["cafe"]) {
        "Cafe"
    } else {
        "Point of Interest"
    }
}

/// Display category guessed from a place name
pub fn category_from_name(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["park", "garden"]) {
        "Park"
    } else if has(&["museum", "gallery"]) {
        "Museum"
    } else if has(&["cafe", "restaurant"]) {
        "Restaurant"
    } else if has(&["art", "mural"]) {
        "Art Gallery"
    } else if has(&["bridge", "monument"]) {
        "Landmark"
    } else if has(&["view", "scenic"]) {
        "Scenic Spot"
    } else {
        "Point of Interest"
    }
}
