//! Source error types.

use thiserror::Error;

/// Errors that can occur when talking to a compound source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source has no record for this compound.
    #[error("compound {0} not found")]
    NotFound(u64),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(SourceError::NotFound(42).to_string(), "compound 42 not found");
        assert_eq!(
            SourceError::Timeout(10).to_string(),
            "request timed out after 10s"
        );
    }
}
