//! Search-and-aggregation pipeline for Waypoint.
//!
//! [`SearchSession`] owns the query lifecycle: it debounces keystrokes into
//! suggestion lookups, fans a committed query out to the place-listing and
//! weather sources, and publishes one [`SearchResult`] view model.

pub mod error;
pub mod messages;
pub mod query;
pub mod session;
pub mod sources;
pub mod suggestions;
mod task;
pub mod view;

pub use error::{Channel, SearchError};
pub use query::QueryTarget;
pub use session::{SearchSession, SessionSettings};
pub use sources::{PlaceSource, PlacesService, SuggestionSource, WeatherSource};
pub use view::{SearchResult, SearchStatus, SectionState};

pub use waypoint_places::PlaceRecord;
pub use waypoint_suggest::{Coordinates, Suggestion};
pub use waypoint_weather::WeatherSnapshot;
