//! Session and gateway error types.

use thiserror::Error;

/// Errors from the identity gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway rejected the request.
    #[error("gateway request failed: status {status}: {body}")]
    RequestFailed {
        /// HTTP status returned.
        status: u16,
        /// Response body, captured for diagnostics.
        body: String,
    },

    /// The bearer token was rejected as expired or invalid.
    #[error("bearer token rejected: status {status}")]
    TokenRejected {
        /// HTTP status returned (401 or 403).
        status: u16,
    },

    /// The token cannot be encoded as an authorization header.
    #[error("invalid credential encoding: {0}")]
    InvalidCredential(String),

    /// The response did not match the expected shape.
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Transport-level error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot be parsed.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// Whether this failure means the credential itself was rejected.
    #[must_use]
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, Self::TokenRejected { .. })
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the session controller.
///
/// Only user-initiated operations surface errors; the refresh path absorbs
/// its own failures and resolves to the unauthenticated state instead.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The login-callback code/state exchange was rejected.
    #[error("login exchange failed: {0}")]
    Exchange(#[source] GatewayError),

    /// A gateway call outside the login-callback flow failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A store write failed.
    #[error(transparent)]
    Store(#[from] anteroom_store::StoreError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejection_is_distinguishable() {
        let err = GatewayError::TokenRejected { status: 401 };
        assert!(err.is_token_rejection());

        let err = GatewayError::RequestFailed {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_token_rejection());
    }

    #[test]
    fn exchange_failure_names_its_source() {
        let err = SessionError::Exchange(GatewayError::RequestFailed {
            status: 400,
            body: "bad code".to_string(),
        });
        assert!(err.to_string().contains("login exchange failed"));
    }
}
