//! Error types for telemetry and forecast fetching.

use thiserror::Error;

/// Errors a provider may return for a single call.
///
/// The batch fetcher logs these and degrades the call to an empty result.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Invalid response
    #[error("invalid response: {0}")]
    ParseError(String),

    /// Client could not be constructed
    #[error("client setup failed: {0}")]
    Client(String),
}
