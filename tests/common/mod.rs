use async_trait::async_trait;
use photoroute::config::DiscoveryConfig;
use photoroute::constants::CACHE_KEY_PRECISION;
use photoroute::error::{AppError, Result};
use photoroute::models::{
    Coordinates, ElevationSample, StreetViewAvailability, TravelMode,
};
use photoroute::services::provider::{
    DirectionsRoute, MapsProvider, NearbyPlace, NearbySearch, PlaceDetailsResult, PlacePhoto,
    RouteLeg, RouteStep, TextValue,
};
use photoroute::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted in-process maps provider with call counters
#[allow(dead_code)]
pub struct MockProvider {
    pub init_result: Result<()>,
    pub directions: HashMap<TravelMode, Result<Vec<DirectionsRoute>>>,
    pub directions_delay: Duration,
    pub nearby: Result<Vec<NearbyPlace>>,
    /// Per-location answers keyed by cache key, each after its own delay.
    /// Locations not listed fall back to `nearby`.
    pub nearby_by_location: HashMap<String, (Duration, Vec<NearbyPlace>)>,
    pub details: Result<PlaceDetailsResult>,
    pub elevation: Result<Vec<ElevationSample>>,
    pub street_view: Result<StreetViewAvailability>,
    pub photo: Result<PlacePhoto>,

    pub init_calls: AtomicUsize,
    pub directions_calls: AtomicUsize,
    pub directions_completed: AtomicUsize,
    pub nearby_calls: AtomicUsize,
    pub nearby_locations: Mutex<Vec<Coordinates>>,
}

#[allow(dead_code)]
impl MockProvider {
    /// Every mode returns no routes; every lookup succeeds empty
    pub fn new() -> Self {
        MockProvider {
            init_result: Ok(()),
            directions: HashMap::new(),
            directions_delay: Duration::ZERO,
            nearby: Ok(Vec::new()),
            nearby_by_location: HashMap::new(),
            details: Err(AppError::PlacesLookup("NOT_FOUND".to_string())),
            elevation: Ok(Vec::new()),
            street_view: Ok(StreetViewAvailability::Unavailable),
            photo: Ok(PlacePhoto {
                content_type: "image/jpeg".to_string(),
                bytes: b"\xFF\xD8jpeg".to_vec(),
            }),
            init_calls: AtomicUsize::new(0),
            directions_calls: AtomicUsize::new(0),
            directions_completed: AtomicUsize::new(0),
            nearby_calls: AtomicUsize::new(0),
            nearby_locations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_routes(mut self, mode: TravelMode, routes: Vec<DirectionsRoute>) -> Self {
        self.directions.insert(mode, Ok(routes));
        self
    }

    pub fn with_directions_error(mut self, mode: TravelMode, error: AppError) -> Self {
        self.directions.insert(mode, Err(error));
        self
    }

    pub fn failing_all_modes(mut self) -> Self {
        for mode in TravelMode::DISCOVERY_MODES {
            self.directions
                .insert(mode, Err(AppError::Directions("NOT_FOUND".to_string())));
        }
        self
    }

    pub fn with_nearby(mut self, places: Vec<NearbyPlace>) -> Self {
        self.nearby = Ok(places);
        self
    }

    /// Answer searches around `location` with `places`, after `delay`
    pub fn with_nearby_at(
        mut self,
        location: Coordinates,
        delay: Duration,
        places: Vec<NearbyPlace>,
    ) -> Self {
        self.nearby_by_location
            .insert(location.cache_key(CACHE_KEY_PRECISION), (delay, places));
        self
    }

    pub fn directions_calls(&self) -> usize {
        self.directions_calls.load(Ordering::SeqCst)
    }

    pub fn nearby_calls(&self) -> usize {
        self.nearby_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapsProvider for MockProvider {
    async fn initialize(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.init_result.clone()
    }

    async fn directions(
        &self,
        _origin: &str,
        _destination: &str,
        mode: TravelMode,
    ) -> Result<Vec<DirectionsRoute>> {
        self.directions_calls.fetch_add(1, Ordering::SeqCst);
        if !self.directions_delay.is_zero() {
            tokio::time::sleep(self.directions_delay).await;
        }
        self.directions_completed.fetch_add(1, Ordering::SeqCst);
        self.directions
            .get(&mode)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn nearby_search(&self, request: &NearbySearch) -> Result<Vec<NearbyPlace>> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        self.nearby_locations.lock().unwrap().push(request.location);
        let key = request.location.cache_key(CACHE_KEY_PRECISION);
        if let Some((delay, places)) = self.nearby_by_location.get(&key) {
            tokio::time::sleep(*delay).await;
            return Ok(places.clone());
        }
        self.nearby.clone()
    }

    async fn place_details(&self, _place_id: &str) -> Result<PlaceDetailsResult> {
        self.details.clone()
    }

    async fn place_photo(
        &self,
        _photo_reference: &str,
        _max_width: u32,
        _max_height: u32,
    ) -> Result<PlacePhoto> {
        self.photo.clone()
    }

    async fn elevation_along_path(
        &self,
        path: &[Coordinates],
        samples: usize,
    ) -> Result<Vec<ElevationSample>> {
        let scripted = self.elevation.clone()?;
        if !scripted.is_empty() {
            return Ok(scripted);
        }
        // Rising by 10 m per sample along the path
        Ok(path
            .iter()
            .take(samples)
            .enumerate()
            .map(|(i, location)| ElevationSample {
                location: *location,
                elevation_m: 100.0 + i as f64 * 10.0,
            })
            .collect())
    }

    async fn street_view(
        &self,
        _location: &Coordinates,
        _radius_m: u32,
    ) -> Result<StreetViewAvailability> {
        self.street_view.clone()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// `len` points heading north from `(lat, lng)`, about 111 m apart
#[allow(dead_code)]
pub fn line_path(lat: f64, lng: f64, len: usize) -> Vec<Coordinates> {
    (0..len)
        .map(|i| Coordinates {
            lat: lat + i as f64 * 0.001,
            lng,
        })
        .collect()
}

/// Single-leg route with structured distance and duration
#[allow(dead_code)]
pub fn route(path: Vec<Coordinates>, meters: f64, seconds: f64) -> DirectionsRoute {
    DirectionsRoute {
        summary: "Test route".to_string(),
        legs: vec![RouteLeg {
            distance: TextValue {
                text: format!("{:.1} km", meters / 1000.0),
                value: Some(meters),
            },
            duration: TextValue {
                text: format!("{} mins", (seconds / 60.0).round()),
                value: Some(seconds),
            },
            steps: vec![RouteStep { path }],
        }],
    }
}

#[allow(dead_code)]
pub fn place(id: &str, name: &str, rating: Option<f64>) -> NearbyPlace {
    NearbyPlace {
        place_id: Some(id.to_string()),
        name: Some(name.to_string()),
        rating,
        location: Some(Coordinates {
            lat: 48.8570,
            lng: 2.3522,
        }),
        photo_url: None,
    }
}

/// Six rated places, average 4.2, three spot types
#[allow(dead_code)]
pub fn six_places() -> Vec<NearbyPlace> {
    vec![
        place("p1", "Riverside Park", Some(4.0)),
        place("p2", "City Museum", Some(4.4)),
        place("p3", "Corner Cafe", Some(4.2)),
        place("p4", "Botanical Garden", Some(4.2)),
        place("p5", "History Gallery", Some(4.0)),
        place("p6", "Harbour Cafe", Some(4.4)),
    ]
}

#[allow(dead_code)]
pub fn test_state(provider: Arc<MockProvider>) -> Arc<AppState> {
    Arc::new(AppState::new(provider, DiscoveryConfig::default()))
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("GOOGLE_MAPS_API_KEY").is_err()
}
