pub mod coordinates;
pub mod photo_spot;
pub mod place;
pub mod route;

pub use coordinates::Coordinates;
pub use photo_spot::{PhotoSpot, SpotType};
pub use place::{
    DetailsSource, ElevationProfile, ElevationSample, PlaceDetails, PlaceReview,
    StreetViewAvailability,
};
pub use route::{RouteCandidate, ScoreBreakdown, TravelMode};
