//! Stable application-wide constants.
//!
//! Values here are structural invariants, provider request parameters, and
//! default fallbacks for env-var-based configuration. Tuning knobs that are
//! worth experimenting with at runtime live in
//! [`DiscoveryConfig`](crate::config::DiscoveryConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";
/// Mount point of the versioned HTTP API.
pub const API_PREFIX: &str = "/api/v1";

// --- Provider defaults ---

/// Google Maps Platform web-service root. Overridden by `GOOGLE_MAPS_BASE_URL`.
pub const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
/// Per-request timeout for provider calls. Overridden by `PROVIDER_TIMEOUT_SECS`.
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 30;

// --- Ranking and duration adjustment ---

/// Candidates whose photo scores differ by less than this are ranked by
/// adjusted duration instead of score.
pub const DEFAULT_TIE_BREAK_THRESHOLD: u8 = 10;
/// Minutes added to a route's duration for each photo stop.
pub const DEFAULT_PHOTO_STOP_MINUTES: u32 = 5;

// --- Photo spot sampling ---

/// Nearby-search radius around each sample point, in meters.
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 200;
/// Spots rated below this (or unrated) are discarded.
pub const DEFAULT_MIN_SPOT_RATING: f64 = 3.5;
/// Lower bound on sample points per route.
pub const DEFAULT_MIN_SAMPLE_POINTS: usize = 3;
/// Upper bound on sample points per route. Bounds provider calls per route.
pub const DEFAULT_MAX_SAMPLE_POINTS: usize = 8;
/// One sample point per this many raw path points (before clamping).
pub const DEFAULT_PATH_POINTS_PER_SAMPLE: usize = 20;

/// Place type sent with every nearby search.
pub const NEARBY_SEARCH_TYPE: &str = "point_of_interest";
/// Keyword filter sent with every nearby search.
pub const PHOTO_SPOT_KEYWORDS: &[&str] = &[
    "photo", "scenic", "landmark", "art", "mural", "cafe", "park", "view", "museum", "gallery",
    "monument", "statue", "bridge", "fountain", "garden",
];

/// Decimal places used for the photo-spot cache key (~100 m grid).
pub const CACHE_KEY_PRECISION: u32 = 3;

// --- Photos ---

/// Thumbnail size requested for photo spot cards.
pub const SPOT_PHOTO_MAX_WIDTH: u32 = 150;
pub const SPOT_PHOTO_MAX_HEIGHT: u32 = 100;
/// Larger size requested for the place-details gallery.
pub const DETAIL_PHOTO_MAX_WIDTH: u32 = 400;
pub const DETAIL_PHOTO_MAX_HEIGHT: u32 = 300;
/// Maximum gallery photos and reviews kept from a place-details lookup.
pub const MAX_DETAIL_PHOTOS: usize = 6;
pub const MAX_DETAIL_REVIEWS: usize = 5;
/// Largest photo edge the photo endpoint will request from the provider.
pub const MAX_PHOTO_DIMENSION: u32 = 1600;
/// Browser cache lifetime for proxied photos, in seconds.
pub const PHOTO_CACHE_MAX_AGE_SECONDS: u32 = 86_400;
/// Placeholder images are picked from this many variants.
pub const PLACEHOLDER_VARIANTS: u64 = 1_000;

// --- Route naming ---

/// Themed labels assigned by ordinal within a travel mode's result set.
pub const ROUTE_NAMES: &[&str] = &[
    "Scenic Route",
    "Cultural Path",
    "Art Walk",
    "Historic Trail",
    "Photo Route",
];

// --- Terrain ---

/// Maximum elevation samples requested along a path.
pub const MAX_ELEVATION_SAMPLES: usize = 100;
/// Street View metadata search radius, in meters.
pub const STREET_VIEW_RADIUS_METERS: u32 = 50;
