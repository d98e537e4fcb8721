use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub google_maps_api_key: String,
    /// Override for the provider root, e.g. a local proxy or test server
    pub google_maps_base_url: Option<String>,
    pub provider_timeout_secs: u64,
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Score gap below which shorter adjusted duration wins the ranking
    pub tie_break_threshold: u8,

    /// Minutes added per photo spot when adjusting a route's duration
    pub photo_stop_minutes: u32,

    /// Nearby-search radius around each sample point (meters)
    pub search_radius_m: u32,

    /// Minimum provider rating for a place to count as a photo spot
    pub min_rating: f64,

    /// Sample-point count bounds and density
    pub min_sample_points: usize,
    pub max_sample_points: usize,
    pub path_points_per_sample: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            tie_break_threshold: DEFAULT_TIE_BREAK_THRESHOLD,
            photo_stop_minutes: DEFAULT_PHOTO_STOP_MINUTES,
            search_radius_m: DEFAULT_SEARCH_RADIUS_METERS,
            min_rating: DEFAULT_MIN_SPOT_RATING,
            min_sample_points: DEFAULT_MIN_SAMPLE_POINTS,
            max_sample_points: DEFAULT_MAX_SAMPLE_POINTS,
            path_points_per_sample: DEFAULT_PATH_POINTS_PER_SAMPLE,
        }
    }
}

impl DiscoveryConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            tie_break_threshold: env::var("PHOTO_TIE_BREAK_THRESHOLD")
                .unwrap_or_else(|_| defaults.tie_break_threshold.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_TIE_BREAK_THRESHOLD")?,

            photo_stop_minutes: env::var("PHOTO_STOP_MINUTES")
                .unwrap_or_else(|_| defaults.photo_stop_minutes.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_STOP_MINUTES")?,

            search_radius_m: env::var("PHOTO_SEARCH_RADIUS_M")
                .unwrap_or_else(|_| defaults.search_radius_m.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_SEARCH_RADIUS_M")?,

            min_rating: env::var("PHOTO_MIN_RATING")
                .unwrap_or_else(|_| defaults.min_rating.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_MIN_RATING")?,

            min_sample_points: env::var("PHOTO_MIN_SAMPLES")
                .unwrap_or_else(|_| defaults.min_sample_points.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_MIN_SAMPLES")?,

            max_sample_points: env::var("PHOTO_MAX_SAMPLES")
                .unwrap_or_else(|_| defaults.max_sample_points.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_MAX_SAMPLES")?,

            path_points_per_sample: env::var("PHOTO_POINTS_PER_SAMPLE")
                .unwrap_or_else(|_| defaults.path_points_per_sample.to_string())
                .parse()
                .map_err(|_| "Invalid PHOTO_POINTS_PER_SAMPLE")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_sample_points == 0 {
            return Err("PHOTO_MIN_SAMPLES must be at least 1".to_string());
        }
        if self.max_sample_points < self.min_sample_points {
            return Err("PHOTO_MAX_SAMPLES must not be below PHOTO_MIN_SAMPLES".to_string());
        }
        if self.path_points_per_sample == 0 {
            return Err("PHOTO_POINTS_PER_SAMPLE must be at least 1".to_string());
        }
        if !(0.0..=5.0).contains(&self.min_rating) {
            return Err("PHOTO_MIN_RATING must be between 0 and 5".to_string());
        }
        if self.search_radius_m == 0 || self.search_radius_m > 50_000 {
            return Err("PHOTO_SEARCH_RADIUS_M must be between 1 and 50000 meters".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY")
            .map_err(|_| "GOOGLE_MAPS_API_KEY must be set")?;
        if google_maps_api_key.trim().is_empty() {
            return Err("GOOGLE_MAPS_API_KEY must not be empty".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            google_maps_api_key,
            google_maps_base_url: env::var("GOOGLE_MAPS_BASE_URL").ok(),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid PROVIDER_TIMEOUT_SECS")?,
            discovery: DiscoveryConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
