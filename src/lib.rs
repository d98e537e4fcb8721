// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use config::DiscoveryConfig;
use services::place_details::PlaceDetailsService;
use services::provider::{MapsProvider, ProviderGateway};
use services::route_discovery::RouteDiscovery;
use services::terrain::TerrainService;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub gateway: ProviderGateway,
    pub discovery: RouteDiscovery,
    pub place_details: PlaceDetailsService,
    pub terrain: TerrainService,
}

impl AppState {
    /// Wire every service to one shared provider gateway
    pub fn new(provider: Arc<dyn MapsProvider>, discovery_config: DiscoveryConfig) -> Self {
        let gateway = ProviderGateway::new(provider);
        AppState {
            discovery: RouteDiscovery::new(gateway.clone(), discovery_config),
            place_details: PlaceDetailsService::new(gateway.clone()),
            terrain: TerrainService::new(gateway.clone()),
            gateway,
        }
    }
}
