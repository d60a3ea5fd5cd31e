//! Anteroom Store — persistence for the session subsystem.
//!
//! Provides the two storage tiers a client session needs:
//!
//! # Tier 1: Durable credentials ([`CredentialStore`])
//!
//! String key/value storage that survives process restarts until explicit
//! deletion. Holds exactly one opaque bearer token under the fixed `"jwt"`
//! key — the only state an authenticated user carries between visits.
//!
//! # Tier 2: Session cache ([`IdentityCache`])
//!
//! JSON key/value storage scoped to the current process/session. Holds at
//! most one resolved identity record under the fixed `"identity"` key; the
//! session controller re-derives it from the token on every fresh start.
//!
//! Neither tier imposes a TTL or size policy of its own. A credential that
//! the issuer has expired still reads back successfully here and surfaces
//! as an identity-refresh failure at the session layer.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cache;
pub mod credential;
pub mod error;

pub use cache::{IdentityCache, MemoryIdentityCache};
pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::{StoreError, StoreResult};
