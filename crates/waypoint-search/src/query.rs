use waypoint_suggest::{Coordinates, Suggestion};

/// What a committed query resolves against.
///
/// Free text goes through the weather geocoder; a chosen suggestion already
/// carries coordinates, so the weather lookup skips straight to stage two.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTarget {
    /// Text shown in the search box
    pub text: String,
    /// Name used in the attraction prompt and on the weather snapshot
    pub place_name: String,
    pub coordinates: Option<Coordinates>,
}

impl QueryTarget {
    pub fn from_text(text: &str) -> Self {
        let text = text.trim().to_string();
        Self {
            place_name: text.clone(),
            text,
            coordinates: None,
        }
    }

    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Self {
            text: suggestion.display_name.clone(),
            place_name: suggestion.short_name.clone(),
            coordinates: Some(suggestion.coordinates),
        }
    }
}
