use crate::error::{AppError, Result};
use crate::models::{
    Coordinates, ElevationSample, PlaceReview, StreetViewAvailability, TravelMode,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Human-readable text plus the structured value behind it, when the
/// provider reports one (meters for distances, seconds for durations).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextValue {
    pub text: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteStep {
    pub path: Vec<Coordinates>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteLeg {
    pub distance: TextValue,
    pub duration: TextValue,
    pub steps: Vec<RouteStep>,
}

/// One route alternative returned by a directions request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionsRoute {
    pub summary: String,
    pub legs: Vec<RouteLeg>,
}

impl DirectionsRoute {
    /// Every step point across all legs, in traversal order.
    /// Points shared by consecutive steps are kept.
    pub fn path(&self) -> Vec<Coordinates> {
        self.legs
            .iter()
            .flat_map(|leg| leg.steps.iter())
            .flat_map(|step| step.path.iter().copied())
            .collect()
    }

    pub fn distance(&self) -> TextValue {
        self.legs
            .first()
            .map(|leg| leg.distance.clone())
            .unwrap_or_default()
    }

    pub fn duration(&self) -> TextValue {
        self.legs
            .first()
            .map(|leg| leg.duration.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub location: Coordinates,
    pub radius_m: u32,
    pub place_type: String,
    pub keywords: Vec<String>,
}

/// A nearby-search hit as reported by the provider; every field may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyPlace {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<Coordinates>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetailsResult {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub types: Vec<String>,
    pub formatted_address: Option<String>,
    pub weekday_text: Vec<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub price_level: Option<u8>,
    pub photo_urls: Vec<String>,
    pub reviews: Vec<PlaceReview>,
}

/// Image fetched from the provider's photo service
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePhoto {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// External directions / places / elevation / street-view service
#[async_trait]
pub trait MapsProvider: Send + Sync {
    /// Verify the provider can serve requests (credential present, client built)
    async fn initialize(&self) -> Result<()>;

    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Vec<DirectionsRoute>>;

    async fn nearby_search(&self, request: &NearbySearch) -> Result<Vec<NearbyPlace>>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsResult>;

    /// Fetch the image behind a photo reference. The reference is the only
    /// photo handle handed to clients; credentials stay with the provider.
    async fn place_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<PlacePhoto>;

    async fn elevation_along_path(
        &self,
        path: &[Coordinates],
        samples: usize,
    ) -> Result<Vec<ElevationSample>>;

    async fn street_view(
        &self,
        location: &Coordinates,
        radius_m: u32,
    ) -> Result<StreetViewAvailability>;

    fn provider_name(&self) -> &'static str;
}

/// Injected handle to a [`MapsProvider`].
///
/// The provider is initialized at most once. Concurrent callers of
/// [`ready`](Self::ready) await the same attempt; a failed attempt is not
/// remembered, so the next caller tries again. Every call can be aborted
/// through a [`CancellationToken`].
#[derive(Clone)]
pub struct ProviderGateway {
    provider: Arc<dyn MapsProvider>,
    initialized: Arc<OnceCell<()>>,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn MapsProvider>) -> Self {
        ProviderGateway {
            provider,
            initialized: Arc::new(OnceCell::new()),
        }
    }

    pub async fn ready(&self) -> Result<()> {
        self.initialized
            .get_or_try_init(|| async {
                match self.provider.initialize().await {
                    Ok(()) => {
                        tracing::info!(
                            provider = self.provider.provider_name(),
                            "Maps provider initialized"
                        );
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(
                            provider = self.provider.provider_name(),
                            error = %e,
                            "Failed to initialize maps provider"
                        );
                        Err(e)
                    }
                }
            })
            .await
            .map(|_| ())
    }

    pub fn is_ready(&self) -> bool {
        self.initialized.initialized()
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Run a provider future after initialization, unless `cancel` fires first
    async fn call<T, F>(&self, cancel: &CancellationToken, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = async {
                self.ready().await?;
                request.await
            } => result,
        }
    }

    pub async fn directions(
        &self,
        cancel: &CancellationToken,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<Vec<DirectionsRoute>> {
        self.call(cancel, self.provider.directions(origin, destination, mode))
            .await
    }

    pub async fn nearby_search(
        &self,
        cancel: &CancellationToken,
        request: &NearbySearch,
    ) -> Result<Vec<NearbyPlace>> {
        self.call(cancel, self.provider.nearby_search(request)).await
    }

    pub async fn place_details(
        &self,
        cancel: &CancellationToken,
        place_id: &str,
    ) -> Result<PlaceDetailsResult> {
        self.call(cancel, self.provider.place_details(place_id)).await
    }

    pub async fn place_photo(
        &self,
        cancel: &CancellationToken,
        photo_reference: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<PlacePhoto> {
        self.call(
            cancel,
            self.provider
                .place_photo(photo_reference, max_width, max_height),
        )
        .await
    }

    pub async fn elevation_along_path(
        &self,
        cancel: &CancellationToken,
        path: &[Coordinates],
        samples: usize,
    ) -> Result<Vec<ElevationSample>> {
        self.call(cancel, self.provider.elevation_along_path(path, samples))
            .await
    }

    pub async fn street_view(
        &self,
        cancel: &CancellationToken,
        location: &Coordinates,
        radius_m: u32,
    ) -> Result<StreetViewAvailability> {
        self.call(cancel, self.provider.street_view(location, radius_m))
            .await
    }
}
