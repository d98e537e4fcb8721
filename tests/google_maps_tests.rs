use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use photoroute::config::DiscoveryConfig;
use photoroute::error::AppError;
use photoroute::models::{Coordinates, StreetViewAvailability, TravelMode};
use photoroute::services::google_maps::GoogleMapsClient;
use photoroute::services::provider::{MapsProvider, NearbySearch};
use photoroute::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

type Params = Query<HashMap<String, String>>;

/// Canned Google Maps web-service responses. Requests whose `key` is
/// `denied` get REQUEST_DENIED; `forbidden` gets an HTTP 403.
fn stub_router() -> Router {
    Router::new()
        .route("/directions/json", get(stub_directions))
        .route("/place/nearbysearch/json", get(stub_nearby))
        .route("/place/details/json", get(stub_details))
        .route("/elevation/json", get(stub_elevation))
        .route("/streetview/metadata", get(stub_street_view))
        .route("/place/photo", get(stub_photo))
}

/// Serves bytes only when the request carries a key, like the real endpoint
async fn stub_photo(Query(params): Params) -> Response {
    let has_key = params.get("key").is_some_and(|key| !key.is_empty());
    if !has_key || !params.contains_key("photo_reference") {
        return (StatusCode::FORBIDDEN, "missing key").into_response();
    }
    if params["photo_reference"] == "expired" {
        return (StatusCode::OK, "photo reference expired").into_response();
    }
    let body = format!(
        "jpeg:{}:{}x{}",
        params["photo_reference"], params["maxwidth"], params["maxheight"]
    );
    ([(header::CONTENT_TYPE, "image/jpeg")], body).into_response()
}

fn denied(params: &HashMap<String, String>) -> Option<Value> {
    (params.get("key").map(String::as_str) == Some("denied")).then(|| {
        json!({"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."})
    })
}

async fn stub_directions(Query(params): Params) -> (StatusCode, Json<Value>) {
    if params.get("key").map(String::as_str) == Some("forbidden") {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "forbidden"})));
    }
    if let Some(body) = denied(&params) {
        return (StatusCode::OK, Json(body));
    }
    if params.get("destination").map(String::as_str) == Some("Nowhere") {
        return (StatusCode::OK, Json(json!({"status": "ZERO_RESULTS", "routes": []})));
    }

    let body = json!({
        "status": "OK",
        "routes": [{
            "summary": params.get("mode").cloned().unwrap_or_default(),
            "legs": [{
                "distance": {"text": "3.1 km", "value": 3100},
                "duration": {"text": "39 mins", "value": 2340},
                "steps": [
                    {"polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"}},
                    {"polyline": {"points": "_p~iF~ps|U"}}
                ]
            }]
        }]
    });
    (StatusCode::OK, Json(body))
}

async fn stub_nearby(Query(params): Params) -> Json<Value> {
    if let Some(body) = denied(&params) {
        return Json(body);
    }
    if params.get("location").map(String::as_str) == Some("0,0") {
        return Json(json!({"status": "ZERO_RESULTS", "results": []}));
    }
    if params.get("location").map(String::as_str) == Some("1,1") {
        return Json(json!({"status": "OVER_QUERY_LIMIT", "results": []}));
    }

    Json(json!({
        "status": "OK",
        "results": [
            {
                "place_id": "pont-neuf",
                "name": "Pont Neuf",
                "rating": 4.7,
                "geometry": {"location": {"lat": 48.8571, "lng": 2.3413}},
                "photos": [{"photo_reference": "ref/1"}]
            },
            {
                "place_id": "unrated",
                "name": "Kiosk",
                "geometry": {"location": {"lat": 48.8572, "lng": 2.3414}}
            }
        ]
    }))
}

async fn stub_details(Query(params): Params) -> Json<Value> {
    if params.get("place_id").map(String::as_str) == Some("missing") {
        return Json(json!({"status": "NOT_FOUND"}));
    }

    Json(json!({
        "status": "OK",
        "result": {
            "name": "Pont Neuf",
            "rating": 4.7,
            "user_ratings_total": 41000,
            "types": ["tourist_attraction", "point_of_interest"],
            "formatted_address": "Pont Neuf, 75001 Paris",
            "opening_hours": {"weekday_text": ["Monday: Open 24 hours"]},
            "price_level": 0,
            "photos": [
                {"photo_reference": "a"}, {"photo_reference": "b"}, {"photo_reference": "c"},
                {"photo_reference": "d"}, {"photo_reference": "e"}, {"photo_reference": "f"},
                {"photo_reference": "g"}
            ],
            "reviews": [{"author_name": "Camille", "rating": 5, "text": "Lovely at dusk"}]
        }
    }))
}

async fn stub_elevation(Query(params): Params) -> Json<Value> {
    let samples: usize = params
        .get("samples")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let path_is_encoded = params.get("path").is_some_and(|p| p.starts_with("enc:"));
    if !path_is_encoded {
        return Json(json!({"status": "INVALID_REQUEST", "error_message": "bad path"}));
    }

    let results: Vec<Value> = (0..samples)
        .map(|i| {
            json!({
                "elevation": 30.0 + i as f64 * 5.0,
                "location": {"lat": 48.85 + i as f64 * 0.001, "lng": 2.35},
                "resolution": 9.5
            })
        })
        .collect();
    Json(json!({"status": "OK", "results": results}))
}

async fn stub_street_view(Query(params): Params) -> Json<Value> {
    if params.get("location").map(String::as_str) == Some("0,0") {
        return Json(json!({"status": "ZERO_RESULTS"}));
    }
    Json(json!({
        "status": "OK",
        "pano_id": "pano-abc",
        "location": {"lat": 48.8584, "lng": 2.2945}
    }))
}

/// Serve the stub on an ephemeral port and point a client at it
async fn stub_client(api_key: &str) -> GoogleMapsClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router()).await.unwrap();
    });

    GoogleMapsClient::with_config(api_key.to_string(), format!("http://{}/", addr), 5).unwrap()
}

fn nearby(lat: f64, lng: f64) -> NearbySearch {
    NearbySearch {
        location: Coordinates { lat, lng },
        radius_m: 200,
        place_type: "point_of_interest".to_string(),
        keywords: vec!["photo".to_string(), "scenic".to_string()],
    }
}

#[tokio::test]
async fn test_directions_decodes_steps_and_structured_values() {
    let client = stub_client("test-key").await;

    let routes = client
        .directions("Louvre", "Eiffel Tower", TravelMode::Cycling)
        .await
        .unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].summary, "bicycling");

    let path = routes[0].path();
    // Step polylines decode independently and are concatenated
    assert_eq!(path.len(), 4);
    assert!((path[0].lat - 38.5).abs() < 1e-5);
    assert!((path[2].lng - -126.453).abs() < 1e-5);
    assert!((path[3].lng - -120.2).abs() < 1e-5);

    assert_eq!(routes[0].distance().text, "3.1 km");
    assert_eq!(routes[0].distance().value, Some(3100.0));
    assert_eq!(routes[0].duration().value, Some(2340.0));
}

#[tokio::test]
async fn test_directions_zero_results_is_an_error() {
    let client = stub_client("test-key").await;
    let result = client
        .directions("Louvre", "Nowhere", TravelMode::Walking)
        .await;
    assert!(matches!(result, Err(AppError::Directions(_))));
}

#[tokio::test]
async fn test_request_denied_is_provider_unavailable() {
    let client = stub_client("denied").await;

    let directions = client.directions("A", "B", TravelMode::Walking).await;
    assert!(matches!(directions, Err(AppError::ProviderUnavailable(_))));

    let places = client.nearby_search(&nearby(48.85, 2.35)).await;
    assert!(matches!(places, Err(AppError::ProviderUnavailable(_))));
}

#[tokio::test]
async fn test_http_forbidden_is_provider_unavailable() {
    let client = stub_client("forbidden").await;
    let result = client.directions("A", "B", TravelMode::Walking).await;
    assert!(matches!(result, Err(AppError::ProviderUnavailable(_))));
}

#[tokio::test]
async fn test_nearby_search() {
    let client = stub_client("test-key").await;

    let places = client.nearby_search(&nearby(48.857, 2.341)).await.unwrap();
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].place_id.as_deref(), Some("pont-neuf"));
    assert_eq!(places[0].rating, Some(4.7));
    assert_eq!(
        places[0].photo_url.as_deref(),
        Some("/api/v1/photos/ref%2F1?maxwidth=150&maxheight=100")
    );
    assert_eq!(places[1].rating, None);
    assert!(places[1].photo_url.is_none());
}

#[tokio::test]
async fn test_nearby_zero_results_is_empty() {
    let client = stub_client("test-key").await;
    let places = client.nearby_search(&nearby(0.0, 0.0)).await.unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn test_nearby_other_status_is_places_error() {
    let client = stub_client("test-key").await;
    let result = client.nearby_search(&nearby(1.0, 1.0)).await;
    assert!(matches!(result, Err(AppError::PlacesLookup(_))));
}

#[tokio::test]
async fn test_place_details() {
    let client = stub_client("test-key").await;

    let details = client.place_details("pont-neuf").await.unwrap();
    assert_eq!(details.name.as_deref(), Some("Pont Neuf"));
    assert_eq!(details.user_ratings_total, Some(41000));
    assert_eq!(details.photo_urls.len(), 6);
    assert_eq!(details.photo_urls[0], "/api/v1/photos/a?maxwidth=400&maxheight=300");
    assert_eq!(details.weekday_text, vec!["Monday: Open 24 hours".to_string()]);
    assert_eq!(details.reviews.len(), 1);
    assert_eq!(details.reviews[0].author, "Camille");
    assert_eq!(details.reviews[0].time, "Recently");

    let missing = client.place_details("missing").await;
    assert!(matches!(missing, Err(AppError::PlacesLookup(_))));
}

#[tokio::test]
async fn test_elevation_along_path() {
    let client = stub_client("test-key").await;
    let path = common::line_path(48.85, 2.35, 4);

    let samples = client.elevation_along_path(&path, 4).await.unwrap();
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].elevation_m, 30.0);
    assert_eq!(samples[3].elevation_m, 45.0);
}

#[tokio::test]
async fn test_street_view_metadata() {
    let client = stub_client("test-key").await;

    let available = client
        .street_view(&Coordinates { lat: 48.8584, lng: 2.2945 }, 50)
        .await
        .unwrap();
    assert_eq!(
        available,
        StreetViewAvailability::Available {
            pano_id: "pano-abc".to_string(),
            location: Some(Coordinates { lat: 48.8584, lng: 2.2945 }),
        }
    );

    let unavailable = client
        .street_view(&Coordinates { lat: 0.0, lng: 0.0 }, 50)
        .await
        .unwrap();
    assert_eq!(unavailable, StreetViewAvailability::Unavailable);
}

#[tokio::test]
async fn test_place_photo_is_fetched_with_server_key() {
    let client = stub_client("test-key").await;

    let photo = client.place_photo("ref/1", 150, 100).await.unwrap();
    assert_eq!(photo.content_type, "image/jpeg");
    assert_eq!(photo.bytes, b"jpeg:ref/1:150x100".to_vec());
}

#[tokio::test]
async fn test_place_photo_rejects_non_image_response() {
    let client = stub_client("test-key").await;
    let result = client.place_photo("expired", 150, 100).await;
    assert!(matches!(result, Err(AppError::PlacesLookup(_))));
}

#[tokio::test]
async fn test_photo_urls_never_carry_api_key() {
    let secret = "SERVER-SECRET";
    let client = stub_client(secret).await;

    let places = client.nearby_search(&nearby(48.857, 2.341)).await.unwrap();
    let details = client.place_details("pont-neuf").await.unwrap();

    let urls = places
        .iter()
        .filter_map(|place| place.photo_url.as_deref())
        .chain(details.photo_urls.iter().map(String::as_str));
    for url in urls {
        assert!(!url.contains(secret), "API key in photo url {}", url);
        assert!(!url.contains("key="), "key parameter in photo url {}", url);
        assert!(url.starts_with("/api/v1/photos/"));
    }
}

#[tokio::test]
async fn test_api_responses_never_carry_api_key() {
    let secret = "SERVER-SECRET";
    let provider = Arc::new(stub_client(secret).await);
    let app = photoroute::routes::create_router(Arc::new(AppState::new(
        provider,
        DiscoveryConfig::default(),
    )));

    let routes_request = Request::builder()
        .method("POST")
        .uri("/routes/photo")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"origin": "Louvre", "destination": "Pont Neuf"}"#))
        .unwrap();
    let spots_request = Request::builder()
        .uri("/spots/pont-neuf?name=Pont%20Neuf&rating=4.7")
        .body(Body::empty())
        .unwrap();

    for request in [routes_request, spots_request] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("/api/v1/photos/"), "no proxied photo in {}", text);
        assert!(!text.contains(secret), "API key leaked in {}", text);
    }

    // The proxied URL resolves through the server, which adds the key
    let photo_request = Request::builder()
        .uri("/photos/ref%2F1?maxwidth=150&maxheight=100")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(photo_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"jpeg:ref/1:150x100");
}

#[tokio::test]
async fn test_initialize_requires_key() {
    assert!(GoogleMapsClient::new(String::new()).initialize().await.is_err());
    assert!(GoogleMapsClient::new("key".to_string()).initialize().await.is_ok());
}

#[tokio::test]
async fn test_real_google_directions() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
        .expect("GOOGLE_MAPS_API_KEY must be set for integration tests");
    let client = GoogleMapsClient::new(api_key);

    let routes = client
        .directions(
            "Louvre Museum, Paris",
            "Eiffel Tower, Paris",
            TravelMode::Walking,
        )
        .await
        .expect("Google Directions call should succeed");

    assert!(!routes.is_empty(), "Should return at least one route");
    assert!(routes[0].path().len() >= 2, "Route should have a path");

    // Walking from the Louvre to the Eiffel Tower is roughly 3-5km
    let meters = routes[0].distance().value.unwrap_or(0.0);
    assert!(
        meters > 2000.0 && meters < 7000.0,
        "Distance should be reasonable: got {}m",
        meters
    );
}

#[tokio::test]
async fn test_real_google_nearby_search() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY")
        .expect("GOOGLE_MAPS_API_KEY must be set for integration tests");
    let client = GoogleMapsClient::new(api_key);

    let places = client
        .nearby_search(&nearby(48.8584, 2.2945))
        .await
        .expect("Google Places call should succeed");
    assert!(
        places.iter().all(|p| p.place_id.is_some()),
        "Every place should carry an id"
    );
}
