//! CloudWatch Logs error types

use thiserror::Error;

/// Failure to build a session from the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("AWS access key id is empty")]
    MissingAccessKey,
    #[error("AWS secret access key is empty")]
    MissingSecretKey,
    #[error("'{0}' is not a valid AWS region")]
    InvalidRegion(String),
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Failure of a single service call or of a whole paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{operation}: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

impl FetchError {
    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Service { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::service("GetLogEvents", "connection reset");
        assert_eq!(err.to_string(), "GetLogEvents: connection reset");
        assert_eq!(err.operation(), "GetLogEvents");
    }

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::InvalidRegion("moon-1".to_string());
        assert_eq!(err.to_string(), "'moon-1' is not a valid AWS region");
    }
}
