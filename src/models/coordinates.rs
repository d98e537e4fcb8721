use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Round coordinates to specified decimal places for caching
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }

    /// Coarse grid key, e.g. `"48.857,2.352"` for 3 decimal places.
    /// Points that share a key share cached nearby-search results.
    pub fn cache_key(&self, decimal_places: u32) -> String {
        let rounded = self.round(decimal_places);
        let precision = decimal_places as usize;
        format!(
            "{:.*},{:.*}",
            precision, rounded.lat, precision, rounded.lng
        )
    }

    /// Human-readable distance to another point: whole meters below 1 km,
    /// otherwise kilometers with one decimal.
    pub fn formatted_distance_to(&self, other: &Coordinates) -> String {
        let meters = self.distance_to(other) * 1000.0;
        if meters < 1000.0 {
            format!("{}m", meters.round() as i64)
        } else {
            format!("{:.1}km", meters / 1000.0)
        }
    }

    /// `"lat,lng"` as the provider expects in query parameters
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}
