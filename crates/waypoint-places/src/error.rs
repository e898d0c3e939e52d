use thiserror::Error;
use waypoint_core::NetworkError;

#[derive(Debug, Clone, Error)]
pub enum PlacesError {
    #[error("Text-generation API key is not configured")]
    MissingApiKey,

    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The call succeeded but the response held no text to parse.
    #[error("Response contained no text: {0}")]
    EmptyResponse(String),
}

impl PlacesError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Place listings are unavailable: no API key configured.",
            Self::Network(_) => "Couldn't load places. Please try again.",
            Self::EmptyResponse(_) => "No places were found for this location.",
        }
    }

    /// True when the text-generation call itself failed, as opposed to
    /// succeeding with an unusable answer.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::Network(_))
    }
}
