//! Weather lookup for Waypoint
//!
//! Resolves a place name to coordinates and fetches current conditions
//! from an OpenWeather-compatible API.

pub mod geocode;
pub mod provider;
pub mod types;

pub use geocode::GeoMatch;
pub use provider::WeatherProvider;
pub use types::*;
