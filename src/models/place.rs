use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Where a details record came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetailsSource {
    Provider,
    /// Synthesised from the photo spot after the provider lookup failed
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceReview {
    pub author: String,
    pub rating: f64,
    pub text: String,
    /// Provider's relative description, e.g. "2 weeks ago"
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub name: String,
    pub rating: f64,
    pub review_count: u32,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// "$" repeated per provider price level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub photos: Vec<String>,
    pub reviews: Vec<PlaceReview>,
    pub source: DetailsSource,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ElevationSample {
    pub location: Coordinates,
    pub elevation_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElevationProfile {
    pub samples: Vec<ElevationSample>,
    pub min_elevation_m: f64,
    pub max_elevation_m: f64,
    /// Sum of positive elevation deltas between consecutive samples
    pub total_ascent_m: f64,
}

impl ElevationProfile {
    pub fn from_samples(samples: Vec<ElevationSample>) -> Self {
        let (min, max) = samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), s| (min.min(s.elevation_m), max.max(s.elevation_m)),
        );
        let total_ascent_m = samples
            .windows(2)
            .map(|w| (w[1].elevation_m - w[0].elevation_m).max(0.0))
            .sum();

        if samples.is_empty() {
            return ElevationProfile {
                samples,
                min_elevation_m: 0.0,
                max_elevation_m: 0.0,
                total_ascent_m: 0.0,
            };
        }

        ElevationProfile {
            samples,
            min_elevation_m: min,
            max_elevation_m: max,
            total_ascent_m,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StreetViewAvailability {
    Available {
        pano_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<Coordinates>,
    },
    Unavailable,
}
