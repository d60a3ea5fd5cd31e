//! Anteroom Session — token lifecycle and authorization predicates for
//! redirect-based login flows.
//!
//! The subsystem has three moving parts:
//!
//! - [`IdentityGateway`] — the HTTP boundary to the external login flow:
//!   login redirect URL, code/state exchange, identity fetch.
//! - [`SessionController`] — orchestrates the stores and the gateway: the
//!   login callback, start-up re-hydration, refresh-with-invalidation, and
//!   the synchronous profile/permission predicates.
//! - [`NavigationGuards`] — pure predicate adapters translating those
//!   booleans into allow/redirect decisions for a router.
//!
//! Reads flow one way (guards → controller → cache, never the network);
//! writes flow the other (callback/refresh → gateway → stores).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use anteroom_session::{
//!     GatewayConfig, HttpIdentityGateway, NavigationGuards, SessionController,
//! };
//! use anteroom_store::{FileCredentialStore, MemoryIdentityCache};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpIdentityGateway::new(GatewayConfig::new("https://api.example.com"))?;
//! let controller = SessionController::new(
//!     Arc::new(gateway),
//!     FileCredentialStore::open_default("anteroom")?.shared(),
//!     MemoryIdentityCache::new().shared(),
//! )
//! .shared();
//!
//! // Safe on every start, even with a stale or revoked stored token.
//! controller.initialize().await;
//!
//! let _guards = NavigationGuards::new(controller.clone(), "homePage");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod controller;
pub mod error;
pub mod gateway;
pub mod guard;

pub use controller::{IDENTITY_KEY, SessionController, TOKEN_KEY};
pub use error::{GatewayError, GatewayResult, SessionError, SessionResult};
pub use gateway::{GatewayConfig, HttpIdentityGateway, IdentityGateway};
pub use guard::{GuardDecision, NavigationGuards, RedirectTarget};
