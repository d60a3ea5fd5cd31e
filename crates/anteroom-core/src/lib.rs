//! Anteroom Core - foundation types for the Anteroom session SDK.
//!
//! This crate provides:
//! - The [`Identity`] record resolved from a bearer credential
//! - The [`BearerToken`] opaque credential wrapper
//! - Profile and permission code traits plus the shipped deployment
//!   enumerations

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod access;
pub mod identity;
pub mod token;

pub use access::{PermissionCode, ProfileCode};
pub use identity::Identity;
pub use token::BearerToken;
