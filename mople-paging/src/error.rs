/// Fetch-boundary error taxonomy.
///
/// Every failure a remote page or mutation call can produce is folded into one
/// of three variants. The pager converts these into state and never lets them
/// escape its public API.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No connectivity, DNS failure, or timeout. Recoverable by retrying.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response or a body that does not match the expected schema.
    #[error("Server error (status {status:?}): {detail}")]
    Server { status: Option<u16>, detail: String },

    /// The call targeted state that no longer exists (e.g. an already-deleted comment).
    #[error("Application error: {0}")]
    Application(String),
}

impl FetchError {
    pub fn network(detail: impl Into<String>) -> Self {
        FetchError::Network(detail.into())
    }

    pub fn server(status: Option<u16>, detail: impl Into<String>) -> Self {
        FetchError::Server {
            status,
            detail: detail.into(),
        }
    }

    pub fn application(detail: impl Into<String>) -> Self {
        FetchError::Application(detail.into())
    }

    /// Only connectivity failures are worth an immediate user retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_is_retryable() {
        assert!(FetchError::network("timeout").is_retryable());
        assert!(!FetchError::server(Some(500), "boom").is_retryable());
        assert!(!FetchError::application("gone").is_retryable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = FetchError::server(Some(502), "bad gateway");
        assert_eq!(err.to_string(), "Server error (status Some(502)): bad gateway");
    }
}
