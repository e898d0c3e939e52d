//! Shared error types for the Waypoint workspace.
//!
//! Provider crates wrap [`NetworkError`] in their own error enums; the
//! binary collapses everything into [`AppError`] and shows `user_message()`.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    /// Recover the typed error behind an `anyhow` chain where there is one.
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(config) => return AppError::Config(config),
            Err(err) => err,
        };
        let err = match err.downcast::<NetworkError>() {
            Ok(network) => return AppError::Network(network),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(io) => AppError::Io(io),
            Err(err) => AppError::Other(err),
        }
    }
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status == 401 || *status == 403 => {
                "The service rejected our credentials. Check your API keys."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }

    /// Build a `ServerError` from a non-success response, consuming its body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        NetworkError::ServerError { status, message }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Config(ConfigError::Invalid("search.suggestion_limit".into()));
        assert_eq!(
            app_err.user_message(),
            "Invalid configuration. Check your settings."
        );
    }

    #[test]
    fn test_anyhow_downcasts_to_typed_variant() {
        let err = anyhow::Error::new(ConfigError::Invalid("bad url".into()));
        assert!(matches!(AppError::from(err), AppError::Config(_)));

        let err = anyhow::Error::new(NetworkError::Timeout);
        assert!(matches!(AppError::from(err), AppError::Network(NetworkError::Timeout)));

        let err = anyhow::anyhow!("something else");
        assert!(matches!(AppError::from(err), AppError::Other(_)));
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let unauthorized = NetworkError::ServerError {
            status: 401,
            message: String::new(),
        };
        assert!(unauthorized.user_message().contains("credentials"));

        let unavailable = NetworkError::ServerError {
            status: 503,
            message: String::new(),
        };
        assert!(unavailable.user_message().contains("later"));

        let bad_request = NetworkError::ServerError {
            status: 400,
            message: String::new(),
        };
        assert_eq!(bad_request.user_message(), "The request failed. Please try again.");
    }

    #[test]
    fn test_display_includes_status() {
        let err = NetworkError::ServerError {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(err.to_string().contains("502"));
    }
}
