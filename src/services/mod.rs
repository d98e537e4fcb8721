pub mod google_maps;
pub mod photo_spots;
pub mod place_details;
pub mod polyline;
pub mod provider;
pub mod route_discovery;
pub mod terrain;
