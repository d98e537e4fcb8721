use crate::models::{Coordinates, PhotoSpot};
use geojson::{Feature, Geometry, JsonObject, Value as GeoJsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Cycling,
    Driving,
    Transit,
}

impl TravelMode {
    /// Modes the discovery pipeline requests, in issuing order
    pub const DISCOVERY_MODES: [TravelMode; 3] =
        [TravelMode::Walking, TravelMode::Cycling, TravelMode::Driving];

    /// Returns the Google Directions `mode` parameter for this travel mode
    pub fn provider_mode(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "bicycling",
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
        }
    }

    /// Display name used in route ids and labels
    pub fn name(&self) -> &'static str {
        match self {
            TravelMode::Walking => "Walking",
            TravelMode::Cycling => "Cycling",
            TravelMode::Driving => "Driving",
            TravelMode::Transit => "Transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(TravelMode::Walking),
            "bike" | "cycling" | "bicycling" | "bicycle" => Ok(TravelMode::Cycling),
            "drive" | "driving" | "car" => Ok(TravelMode::Driving),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(format!("Invalid travel mode: '{}'", s)),
        }
    }
}

/// Individual components of a photo score, kept for display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub rating: f64,
    pub quantity: f64,
    pub density: f64,
    pub variety: f64,
}

impl ScoreBreakdown {
    /// Sum of components rounded and clamped to 0-100
    pub fn total(&self) -> u8 {
        let sum = self.rating + self.quantity + self.density + self.variety;
        sum.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteCandidate {
    /// `route-{mode}-{ordinal}`
    pub id: String,
    pub name: String,
    pub travel_mode: TravelMode,
    /// Distance text as reported by the provider
    pub distance: String,
    /// Duration including photo-stop overhead
    pub duration: String,
    /// Numeric form of `duration`, used for ranking
    pub adjusted_minutes: u32,
    /// Provider duration before photo stops
    pub base_duration: String,
    /// Photo score (0-100)
    pub photo_score: u8,
    pub score_breakdown: ScoreBreakdown,
    /// Deduplicated, best rated first
    pub photo_spots: Vec<PhotoSpot>,
    pub path: Vec<Coordinates>,
}

impl RouteCandidate {
    /// GeoJSON LineString feature of the path, with id, name and score as properties
    pub fn to_geojson(&self) -> Feature {
        let line: Vec<Vec<f64>> = self.path.iter().map(|c| vec![c.lng, c.lat]).collect();

        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), self.id.clone().into());
        properties.insert("name".to_string(), self.name.clone().into());
        properties.insert("travel_mode".to_string(), self.travel_mode.name().into());
        properties.insert("photo_score".to_string(), self.photo_score.into());

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::LineString(line))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct PhotoRouteRequest {
    pub origin: String,
    pub destination: String,
}

impl PhotoRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.origin.trim().is_empty() {
            return Err("origin must not be empty".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("destination must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub routes: Vec<RouteCandidate>,
}
