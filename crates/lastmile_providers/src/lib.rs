pub mod cache;
pub mod config;
pub mod directions;
pub mod error;
pub mod geo_point;
pub mod geocoding;
pub mod mapbox;
pub mod osrm;
pub mod profile;
pub mod route;
pub mod route_client;

#[cfg(test)]
pub(crate) mod test_utils;
