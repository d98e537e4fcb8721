use crate::models::{PhotoSpot, ScoreBreakdown};
use crate::services::route_discovery::text::{format_duration, parse_distance, parse_duration};
use std::collections::HashSet;

/// Routes shorter than this are scored as if they were this long
const MIN_DENSITY_DISTANCE_KM: f64 = 0.1;

/// Photo score components (0-100 in total)
/// Based on: average rating, spot count, spots per km, variety of spot types
pub fn score_breakdown(spots: &[PhotoSpot], distance_km: f64) -> ScoreBreakdown {
    if spots.is_empty() {
        return ScoreBreakdown::default();
    }

    let count = spots.len() as f64;
    let avg_rating = spots.iter().map(|s| s.rating).sum::<f64>() / count;

    // 1. Rating above 3.0 (0-40 points)
    let rating = ((avg_rating - 3.0) * 20.0).clamp(0.0, 40.0);

    // 2. Quantity (0-30 points, saturates at 10 spots)
    let quantity = (count * 3.0).clamp(0.0, 30.0);

    // 3. Density per km (0-20 points)
    let spots_per_km = count / distance_km.max(MIN_DENSITY_DISTANCE_KM);
    let density = (spots_per_km * 5.0).clamp(0.0, 20.0);

    // 4. Variety of spot types (0-10 points, saturates at 5 types)
    let unique_types: HashSet<_> = spots.iter().map(|s| s.spot_type()).collect();
    let variety = (unique_types.len() as f64 * 2.0).clamp(0.0, 10.0);

    ScoreBreakdown {
        rating,
        quantity,
        density,
        variety,
    }
}

/// Photo score for a route of known length. No spots always scores 0.
pub fn score_for_distance(spots: &[PhotoSpot], distance_km: f64) -> u8 {
    score_breakdown(spots, distance_km).total()
}

/// Photo score from the provider's distance text ("3.1 km").
/// Unparseable text counts as a zero-length route.
pub fn score(spots: &[PhotoSpot], distance_text: &str) -> u8 {
    score_for_distance(spots, parse_distance(distance_text))
}

/// Base minutes plus a fixed stop per photo spot
pub fn adjusted_minutes(base_minutes: u32, spot_count: usize, photo_stop_minutes: u32) -> u32 {
    base_minutes.saturating_add((spot_count as u32).saturating_mul(photo_stop_minutes))
}

/// Adjusted duration text from the provider's duration text.
/// Unparseable text counts as zero base minutes.
pub fn adjusted_duration(base_duration: &str, spot_count: usize, photo_stop_minutes: u32) -> String {
    format_duration(adjusted_minutes(
        parse_duration(base_duration),
        spot_count,
        photo_stop_minutes,
    ))
}
