use axum::Router;
use photoroute::config::Config;
use photoroute::constants::{API_PREFIX, DEFAULT_GOOGLE_MAPS_BASE_URL};
use photoroute::services::google_maps::GoogleMapsClient;
use photoroute::services::provider::MapsProvider;
use photoroute::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting Photo Route API server");
    tracing::info!(
        tie_break_threshold = config.discovery.tie_break_threshold,
        photo_stop_minutes = config.discovery.photo_stop_minutes,
        search_radius_m = config.discovery.search_radius_m,
        "Configuration loaded successfully"
    );

    // Initialize maps provider
    let base_url = config
        .google_maps_base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_GOOGLE_MAPS_BASE_URL.to_string());
    tracing::info!("Using Google Maps at {}", base_url);
    let provider: Arc<dyn MapsProvider> = Arc::new(GoogleMapsClient::with_config(
        config.google_maps_api_key.clone(),
        base_url,
        config.provider_timeout_secs,
    )?);

    // Create application state
    let state = Arc::new(AppState::new(provider, config.discovery.clone()));

    // Surface credential problems at startup; requests retry initialization
    if let Err(e) = state.gateway.ready().await {
        tracing::warn!("Maps provider not ready yet: {}", e);
    }

    // Build router with CORS and tracing
    let app = Router::new()
        .nest(API_PREFIX, photoroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
