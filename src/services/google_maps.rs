use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::photo_spot::proxied_photo_url;
use crate::models::{
    Coordinates, ElevationSample, PlaceReview, StreetViewAvailability, TravelMode,
};
use crate::services::polyline;
use crate::services::provider::{
    DirectionsRoute, MapsProvider, NearbyPlace, NearbySearch, PlaceDetailsResult, PlacePhoto,
    RouteLeg, RouteStep, TextValue,
};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const PLACE_DETAILS_FIELDS: &str = "name,rating,user_ratings_total,types,formatted_address,\
opening_hours,formatted_phone_number,website,photos,reviews,price_level";

/// Google Maps Platform web-service client
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        GoogleMapsClient {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_GOOGLE_MAPS_BASE_URL.to_string(),
        }
    }

    pub fn with_config(api_key: String, base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ProviderUnavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(GoogleMapsClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base_url}/{endpoint}` with the API key appended.
    /// Transport and HTTP-level failures are mapped through `make_error`,
    /// except rejected credentials which become `ProviderUnavailable`.
    /// Error text never includes the request URL, which carries the key.
    async fn send(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        make_error: fn(String) -> AppError,
    ) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| make_error(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                endpoint = endpoint,
                "Google Maps HTTP error {}: {}",
                status, error_text
            );
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(AppError::ProviderUnavailable(format!(
                    "HTTP {}: {}",
                    status, error_text
                )));
            }
            return Err(make_error(format!("HTTP {}: {}", status, error_text)));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        make_error: fn(String) -> AppError,
    ) -> Result<T> {
        self.send(endpoint, query, make_error)
            .await?
            .json()
            .await
            .map_err(|e| make_error(format!("Failed to parse response: {}", e.without_url())))
    }
}

/// Map a non-OK provider status to an error.
/// A denied request means the credential is missing, invalid or unauthorised.
fn status_error(
    status: &str,
    error_message: Option<String>,
    make_error: fn(String) -> AppError,
) -> AppError {
    let detail = match error_message {
        Some(message) => format!("{}: {}", status, message),
        None => status.to_string(),
    };
    if status == "REQUEST_DENIED" {
        AppError::ProviderUnavailable(detail)
    } else {
        make_error(detail)
    }
}

#[async_trait]
impl MapsProvider for GoogleMapsClient {
    async fn initialize(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::ProviderUnavailable(
                "Google Maps API key is missing".to_string(),
            ));
        }
        Ok(())
    }

    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Vec<DirectionsRoute>> {
        tracing::debug!(
            mode = mode.provider_mode(),
            "Directions request: {} -> {} ({})",
            origin, destination, mode
        );

        let response: DirectionsApiResponse = self
            .get_json(
                "directions/json",
                &[
                    ("origin", origin.to_string()),
                    ("destination", destination.to_string()),
                    ("mode", mode.provider_mode().to_string()),
                ],
                AppError::Directions,
            )
            .await?;

        if response.status != "OK" {
            return Err(status_error(
                &response.status,
                response.error_message,
                AppError::Directions,
            ));
        }

        let routes = response
            .routes
            .into_iter()
            .map(ApiRoute::into_route)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            mode = mode.provider_mode(),
            routes = routes.len(),
            "Directions response: {} routes ({})",
            routes.len(), mode
        );
        Ok(routes)
    }

    async fn nearby_search(&self, request: &NearbySearch) -> Result<Vec<NearbyPlace>> {
        let response: NearbySearchApiResponse = self
            .get_json(
                "place/nearbysearch/json",
                &[
                    ("location", request.location.to_query_value()),
                    ("radius", request.radius_m.to_string()),
                    ("type", request.place_type.clone()),
                    ("keyword", request.keywords.join("|")),
                ],
                AppError::PlacesLookup,
            )
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            status => {
                return Err(status_error(
                    status,
                    response.error_message,
                    AppError::PlacesLookup,
                ))
            }
        }

        Ok(response
            .results
            .into_iter()
            .map(|place| NearbyPlace {
                photo_url: place.photos.first().map(|photo| {
                    proxied_photo_url(
                        &photo.photo_reference,
                        SPOT_PHOTO_MAX_WIDTH,
                        SPOT_PHOTO_MAX_HEIGHT,
                    )
                }),
                place_id: place.place_id,
                name: place.name,
                rating: place.rating,
                location: place.geometry.map(|g| g.location.into()),
            })
            .collect())
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResult> {
        let response: PlaceDetailsApiResponse = self
            .get_json(
                "place/details/json",
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", PLACE_DETAILS_FIELDS.to_string()),
                ],
                AppError::PlacesLookup,
            )
            .await?;

        if response.status != "OK" {
            return Err(status_error(
                &response.status,
                response.error_message,
                AppError::PlacesLookup,
            ));
        }
        let place = response.result.ok_or_else(|| {
            AppError::PlacesLookup(format!("No details returned for {}", place_id))
        })?;

        Ok(PlaceDetailsResult {
            photo_urls: place
                .photos
                .iter()
                .take(MAX_DETAIL_PHOTOS)
                .map(|photo| {
                    proxied_photo_url(
                        &photo.photo_reference,
                        DETAIL_PHOTO_MAX_WIDTH,
                        DETAIL_PHOTO_MAX_HEIGHT,
                    )
                })
                .collect(),
            reviews: place
                .reviews
                .into_iter()
                .take(MAX_DETAIL_REVIEWS)
                .map(|review| PlaceReview {
                    author: review
                        .author_name
                        .unwrap_or_else(|| "Anonymous".to_string()),
                    rating: review.rating.unwrap_or(0.0),
                    text: review.text.unwrap_or_default(),
                    time: review
                        .relative_time_description
                        .unwrap_or_else(|| "Recently".to_string()),
                    profile_photo: review.profile_photo_url,
                })
                .collect(),
            name: place.name,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            types: place.types,
            formatted_address: place.formatted_address,
            weekday_text: place
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            phone: place.formatted_phone_number,
            website: place.website,
            price_level: place.price_level,
        })
    }

    async fn place_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<PlacePhoto> {
        // The provider redirects to the image; reqwest follows it
        let response = self
            .send(
                "place/photo",
                &[
                    ("maxwidth", max_width.to_string()),
                    ("maxheight", max_height.to_string()),
                    ("photo_reference", photo_reference.to_string()),
                ],
                AppError::PlacesLookup,
            )
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::PlacesLookup(format!(
                "Photo response is not an image: {:?}",
                content_type
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            AppError::PlacesLookup(format!("Failed to read photo: {}", e.without_url()))
        })?;

        Ok(PlacePhoto {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn elevation_along_path(
        &self,
        path: &[Coordinates],
        samples: usize,
    ) -> Result<Vec<ElevationSample>> {
        let response: ElevationApiResponse = self
            .get_json(
                "elevation/json",
                &[
                    ("path", format!("enc:{}", polyline::encode(path))),
                    ("samples", samples.to_string()),
                ],
                AppError::Elevation,
            )
            .await?;

        if response.status != "OK" {
            return Err(status_error(
                &response.status,
                response.error_message,
                AppError::Elevation,
            ));
        }

        Ok(response
            .results
            .into_iter()
            .filter_map(|result| {
                result.location.map(|location| ElevationSample {
                    location: location.into(),
                    elevation_m: result.elevation,
                })
            })
            .collect())
    }

    async fn street_view(
        &self,
        location: &Coordinates,
        radius_m: u32,
    ) -> Result<StreetViewAvailability> {
        let response: StreetViewMetadataResponse = self
            .get_json(
                "streetview/metadata",
                &[
                    ("location", location.to_query_value()),
                    ("radius", radius_m.to_string()),
                ],
                AppError::StreetView,
            )
            .await?;

        match response.status.as_str() {
            "OK" => Ok(StreetViewAvailability::Available {
                pano_id: response.pano_id.unwrap_or_default(),
                location: response.location.map(Into::into),
            }),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(StreetViewAvailability::Unavailable),
            status => Err(status_error(
                status,
                response.error_message,
                AppError::StreetView,
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "google_maps"
    }
}

// Google Maps API response types

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(value: LatLng) -> Self {
        Coordinates {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiTextValue {
    #[serde(default)]
    text: String,
    value: Option<f64>,
}

impl From<ApiTextValue> for TextValue {
    fn from(value: ApiTextValue) -> Self {
        TextValue {
            text: value.text,
            value: value.value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

impl ApiRoute {
    fn into_route(self) -> Result<DirectionsRoute> {
        let legs = self
            .legs
            .into_iter()
            .map(|leg| {
                let steps = leg
                    .steps
                    .into_iter()
                    .map(|step| {
                        let path = match step.polyline {
                            Some(line) => polyline::decode(&line.points).map_err(|e| {
                                AppError::Directions(format!("Bad step polyline: {}", e))
                            })?,
                            None => Vec::new(),
                        };
                        Ok(RouteStep { path })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(RouteLeg {
                    distance: leg.distance.map(Into::into).unwrap_or_default(),
                    duration: leg.duration.map(Into::into).unwrap_or_default(),
                    steps,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DirectionsRoute {
            summary: self.summary,
            legs,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    distance: Option<ApiTextValue>,
    duration: Option<ApiTextValue>,
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchApiResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<ApiPlace>,
}

#[derive(Debug, Deserialize)]
struct ApiPlace {
    place_id: Option<String>,
    name: Option<String>,
    rating: Option<f64>,
    geometry: Option<ApiGeometry>,
    #[serde(default)]
    photos: Vec<ApiPhoto>,
}

#[derive(Debug, Deserialize)]
struct ApiGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsApiResponse {
    status: String,
    error_message: Option<String>,
    result: Option<ApiPlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct ApiPlaceDetails {
    name: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
    formatted_address: Option<String>,
    opening_hours: Option<ApiOpeningHours>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    price_level: Option<u8>,
    #[serde(default)]
    photos: Vec<ApiPhoto>,
    #[serde(default)]
    reviews: Vec<ApiReview>,
}

#[derive(Debug, Deserialize)]
struct ApiOpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
    relative_time_description: Option<String>,
    profile_photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationApiResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<ApiElevation>,
}

#[derive(Debug, Deserialize)]
struct ApiElevation {
    elevation: f64,
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct StreetViewMetadataResponse {
    status: String,
    error_message: Option<String>,
    pano_id: Option<String>,
    location: Option<LatLng>,
}
