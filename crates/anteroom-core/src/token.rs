//! The opaque bearer credential.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque bearer token.
///
/// The client assumes no structure and performs no verification; possession
/// implies authorization. `Debug` and `Display` redact the secret so the
/// credential never lands in logs, traces or panic messages — callers that
/// genuinely need the raw value (the authorization header) go through
/// [`BearerToken::as_str`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw credential.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BearerToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for BearerToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"<redacted>").finish()
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted>")
    }
}
