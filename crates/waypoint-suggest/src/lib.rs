//! Place-name autocomplete for Waypoint.
//!
//! Wraps a Mapbox-compatible forward geocoding API and turns its features
//! into [`Suggestion`]s.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeocodingClient;
pub use error::SuggestError;
pub use types::{Coordinates, Suggestion};
