use crate::constants::{API_PREFIX, PLACEHOLDER_VARIANTS};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Coarse kind of a photo spot, inferred from its name.
/// Drives the variety component of the photo score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SpotType {
    Park,
    Museum,
    Cafe,
    Art,
    Landmark,
    Other,
}

impl SpotType {
    /// Keyword classifier. First matching rule wins, so "Garden Cafe" is a park.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["park", "garden"]) {
            SpotType::Park
        } else if has(&["museum", "gallery"]) {
            SpotType::Museum
        } else if has(&["cafe", "restaurant"]) {
            SpotType::Cafe
        } else if has(&["art", "mural"]) {
            SpotType::Art
        } else if has(&["bridge", "monument"]) {
            SpotType::Landmark
        } else {
            SpotType::Other
        }
    }
}

impl fmt::Display for SpotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpotType::Park => "park",
            SpotType::Museum => "museum",
            SpotType::Cafe => "cafe",
            SpotType::Art => "art",
            SpotType::Landmark => "landmark",
            SpotType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoSpot {
    /// Provider place id, the deduplication key
    pub id: String,
    pub name: String,
    /// Provider rating, 0-5
    pub rating: f64,
    pub photo_url: String,
    /// Absent when the provider gave no geometry; such spots get no map
    /// marker and no location-based detail lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    /// Distance from the sample point that found this spot ("85m", "1.2km")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

impl PhotoSpot {
    pub fn spot_type(&self) -> SpotType {
        SpotType::classify(&self.name)
    }
}

/// Placeholder image used when a place has no provider photo.
/// The variant is derived from the place id so the same spot always gets
/// the same image.
pub fn placeholder_photo_url(place_id: &str, width: u32, height: u32) -> String {
    let mut hasher = DefaultHasher::new();
    place_id.hash(&mut hasher);
    let variant = hasher.finish() % PLACEHOLDER_VARIANTS;
    format!(
        "https://picsum.photos/{}/{}?random={}&blur=1",
        width, height, variant
    )
}

/// Client-facing URL for a provider photo, served through this API's photo
/// endpoint. The provider credential is added server-side and never appears
/// here.
pub fn proxied_photo_url(photo_reference: &str, max_width: u32, max_height: u32) -> String {
    format!(
        "{}/photos/{}?maxwidth={}&maxheight={}",
        API_PREFIX,
        urlencoding::encode(photo_reference),
        max_width,
        max_height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_type_classification() {
        assert_eq!(SpotType::classify("Central Park"), SpotType::Park);
        assert_eq!(SpotType::classify("Rose GARDEN"), SpotType::Park);
        assert_eq!(SpotType::classify("Louvre Museum"), SpotType::Museum);
        assert_eq!(SpotType::classify("Saatchi Gallery"), SpotType::Museum);
        assert_eq!(SpotType::classify("Corner Cafe"), SpotType::Cafe);
        assert_eq!(SpotType::classify("Street Mural"), SpotType::Art);
        assert_eq!(SpotType::classify("Tower Bridge"), SpotType::Landmark);
        assert_eq!(SpotType::classify("Old Lighthouse"), SpotType::Other);
    }

    #[test]
    fn test_classification_precedence() {
        // park rule comes before cafe and art
        assert_eq!(SpotType::classify("Garden Cafe"), SpotType::Park);
        // museum rule comes before art
        assert_eq!(SpotType::classify("Modern Art Museum"), SpotType::Museum);
    }

    #[test]
    fn test_placeholder_is_stable_per_place() {
        let a = placeholder_photo_url("place-a", 150, 100);
        assert_eq!(a, placeholder_photo_url("place-a", 150, 100));
        assert!(a.starts_with("https://picsum.photos/150/100?random="));
        assert!(a.ends_with("&blur=1"));
    }

    #[test]
    fn test_proxied_photo_url_encodes_reference() {
        assert_eq!(
            proxied_photo_url("ref/1+2", 150, 100),
            "/api/v1/photos/ref%2F1%2B2?maxwidth=150&maxheight=100"
        );
    }
}
