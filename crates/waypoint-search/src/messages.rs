use waypoint_places::PlaceRecord;
use waypoint_suggest::Suggestion;
use waypoint_weather::WeatherSnapshot;

use crate::error::SearchError;

/// Messages sent from spawned lookups back to the session.
///
/// Every message carries the generation it was started for; the session
/// drops any whose generation is no longer current.
#[derive(Debug)]
pub enum SearchMessage {
    /// Debounce elapsed and the suggestion request went out.
    SuggestionsStarted { generation: u64 },
    SuggestionsDone {
        generation: u64,
        result: Result<Vec<Suggestion>, SearchError>,
    },
    PlacesDone {
        generation: u64,
        result: Result<Vec<PlaceRecord>, SearchError>,
    },
    WeatherDone {
        generation: u64,
        result: Result<Option<WeatherSnapshot>, SearchError>,
    },
}
