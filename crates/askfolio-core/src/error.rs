use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskfolioError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AskfolioError {
    /// Returns `true` when the failure happened before any network traffic:
    /// a missing credential or endpoint.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }

    /// Returns `true` for network or service-side failures (connection errors,
    /// non-2xx statuses, malformed responses).
    pub fn is_service_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Completion(_) | Self::Remote(_))
    }
}

pub type Result<T> = std::result::Result<T, AskfolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_classification() {
        let err = AskfolioError::NotConfigured("missing OPENAI_API_KEY".into());
        assert!(err.is_not_configured());
        assert!(!err.is_service_failure());
    }

    #[test]
    fn test_service_failure_classification() {
        let err = AskfolioError::Completion("OpenAI error 401 Unauthorized".into());
        assert!(err.is_service_failure());
        assert!(!err.is_not_configured());

        let err = AskfolioError::Remote("session commit returned 500".into());
        assert!(err.is_service_failure());
    }

    #[test]
    fn test_storage_is_neither() {
        let err = AskfolioError::Storage("disk full".into());
        assert!(!err.is_service_failure());
        assert!(!err.is_not_configured());
    }

    #[test]
    fn test_display_prefix() {
        let err = AskfolioError::InvalidInput("rating must be 1-5".into());
        assert_eq!(err.to_string(), "Invalid input: rating must be 1-5");
    }
}
