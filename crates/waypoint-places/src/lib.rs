//! Points of interest for Waypoint.
//!
//! A text-generation model is asked for a numbered list of attractions and
//! its free-text answer is parsed into [`PlaceRecord`]s.

pub mod client;
pub mod error;
pub mod parser;
pub mod prompt;

pub use client::TextGenerationClient;
pub use error::PlacesError;
pub use parser::{parse_places, PlaceRecord};
pub use prompt::attractions_prompt;
