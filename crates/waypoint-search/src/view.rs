use serde::Serialize;
use waypoint_places::PlaceRecord;
use waypoint_suggest::Suggestion;
use waypoint_weather::WeatherSnapshot;

/// Lifecycle of the committed query as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Nothing committed yet
    #[default]
    Idle,
    Loading,
    /// Both sections settled; either may still be unavailable
    Ready,
    /// The place listing could not be fetched at all
    Failed,
}

/// Per-section state so one failing channel does not hide the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum SectionState {
    #[default]
    Idle,
    Loading,
    Ready,
    Unavailable(String),
}

impl SectionState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Unavailable(_))
    }
}

/// Everything a front end needs to render the search screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    /// Current search box text
    pub query: String,
    /// Query the place and weather sections belong to
    pub committed_query: Option<String>,

    pub suggestions: Vec<Suggestion>,
    pub suggestions_loading: bool,
    pub suggestion_error: Option<String>,

    pub places: Vec<PlaceRecord>,
    pub places_section: SectionState,
    pub weather: Option<WeatherSnapshot>,
    pub weather_section: SectionState,

    pub status: SearchStatus,
    pub error: Option<String>,
    /// Bumped on every commit; 0 until the first one
    pub generation: u64,
}

impl SearchResult {
    /// Fresh result for a just-committed query. Suggestions are closed.
    pub(crate) fn loading(query: &str, generation: u64) -> Self {
        Self {
            query: query.to_string(),
            generation,
            committed_query: Some(query.to_string()),
            places_section: SectionState::Loading,
            weather_section: SectionState::Loading,
            status: SearchStatus::Loading,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub(crate) fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_loading = false;
        self.suggestion_error = None;
    }
}
