use thiserror::Error;
use waypoint_core::NetworkError;

#[derive(Debug, Clone, Error)]
pub enum SuggestError {
    #[error("Geocoding access token is not configured")]
    MissingToken,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl SuggestError {
    /// Short message shown inline under the search box.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Suggestions are unavailable: no geocoding token configured.",
            Self::Network(e) => e.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert!(SuggestError::MissingToken.user_message().contains("token"));
        let err = SuggestError::from(NetworkError::Timeout);
        assert!(err.user_message().contains("timed out"));
    }
}
