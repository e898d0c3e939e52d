//! Failure taxonomy for the aggregation pipeline.
//!
//! Each remote channel reports its own error type; the session folds them
//! into [`SearchError`] so the view model only ever carries short messages.

use std::fmt;

use thiserror::Error;
use waypoint_places::PlacesError;
use waypoint_suggest::SuggestError;
use waypoint_weather::WeatherError;

/// Which remote channel produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Suggestions,
    Places,
    Weather,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Suggestions => "suggestions",
            Channel::Places => "places",
            Channel::Weather => "weather",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// One channel failed; the rest of the result stays usable.
    #[error("{channel} unavailable: {detail}")]
    Transient {
        channel: Channel,
        detail: String,
        message: &'static str,
    },

    /// The text-generation call itself failed; the whole query is failed.
    #[error("place listing failed: {detail}")]
    UpstreamHard {
        detail: String,
        message: &'static str,
    },
}

impl SearchError {
    pub fn channel(&self) -> Channel {
        match self {
            Self::Transient { channel, .. } => *channel,
            Self::UpstreamHard { .. } => Channel::Places,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Self::UpstreamHard { .. })
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Transient { message, .. } | Self::UpstreamHard { message, .. } => message,
        }
    }

    /// A lookup task died before producing a result. For places this counts
    /// as a failed text-generation call.
    pub(crate) fn crashed(channel: Channel) -> Self {
        let detail = format!("{channel} lookup task panicked");
        match channel {
            Channel::Suggestions => Self::Transient {
                channel,
                detail,
                message: "Suggestions are unavailable right now.",
            },
            Channel::Weather => Self::Transient {
                channel,
                detail,
                message: "Weather service unavailable. Please try again later.",
            },
            Channel::Places => Self::UpstreamHard {
                detail,
                message: "Couldn't load places. Please try again.",
            },
        }
    }
}

impl From<&SuggestError> for SearchError {
    fn from(err: &SuggestError) -> Self {
        Self::Transient {
            channel: Channel::Suggestions,
            detail: err.to_string(),
            message: err.user_message(),
        }
    }
}

impl From<&WeatherError> for SearchError {
    fn from(err: &WeatherError) -> Self {
        Self::Transient {
            channel: Channel::Weather,
            detail: err.to_string(),
            message: err.user_message(),
        }
    }
}

impl From<&PlacesError> for SearchError {
    fn from(err: &PlacesError) -> Self {
        if err.is_upstream_failure() {
            Self::UpstreamHard {
                detail: err.to_string(),
                message: err.user_message(),
            }
        } else {
            Self::Transient {
                channel: Channel::Places,
                detail: err.to_string(),
                message: err.user_message(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::NetworkError;

    #[test]
    fn test_places_network_failure_is_hard() {
        let err = SearchError::from(&PlacesError::Network(NetworkError::Timeout));
        assert!(err.is_hard());
        assert_eq!(err.channel(), Channel::Places);
    }

    #[test]
    fn test_empty_answer_is_transient() {
        let err = SearchError::from(&PlacesError::EmptyResponse("SAFETY".into()));
        assert!(!err.is_hard());
        assert_eq!(err.user_message(), "No places were found for this location.");
    }

    #[test]
    fn test_weather_failure_is_transient() {
        let err = SearchError::from(&WeatherError::MissingApiKey);
        assert!(!err.is_hard());
        assert_eq!(err.channel(), Channel::Weather);
        assert!(err.to_string().starts_with("weather unavailable"));
    }
}
