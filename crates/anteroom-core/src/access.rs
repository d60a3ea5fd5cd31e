//! Profile and permission code enumerations.
//!
//! Authorization checks are pure membership tests against the cached
//! [`Identity`](crate::Identity): exactly one profile code per identity,
//! zero or more permission codes. The codes cross a serialization boundary,
//! so every comparison is integer-code equality — never enum identity.
//!
//! Each deployment of the product carries its own closed enumeration.
//! Keeping the variants as distinct Rust types means a check written for one
//! deployment's access model cannot be handed a value from another; the only
//! thing the two models share is the integer wire representation.

use std::fmt::Debug;

/// A role classification from a deployment's closed profile set.
pub trait ProfileCode: Copy + Eq + Debug {
    /// The integer code carried on the wire.
    fn code(self) -> i32;
}

/// A capability from a deployment's closed permission set.
pub trait PermissionCode: Copy + Eq + Debug {
    /// The integer code carried on the wire.
    fn code(self) -> i32;
}

pub mod publishing {
    //! Access codes for the publishing deployment.

    /// Profiles of the publishing deployment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Profile {
        /// Full administrative access.
        Administrator = 1,
        /// Publishes and curates their own content.
        Publisher = 2,
        /// Standard authenticated user.
        User = 3,
    }

    impl super::ProfileCode for Profile {
        fn code(self) -> i32 {
            self as i32
        }
    }

    /// Permissions of the publishing deployment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Permission {
        /// Manage the whole system.
        ManageSystem = 1,
        /// Edit the caller's own profile.
        EditOwnProfile = 2,
        /// Edit any publication regardless of owner.
        EditAllPublications = 3,
        /// Create and publish content.
        Publish = 4,
        /// Comment on publications.
        Comment = 5,
    }

    impl super::PermissionCode for Permission {
        fn code(self) -> i32 {
            self as i32
        }
    }
}

pub mod rooms {
    //! Access codes for the rooms deployment.

    /// Profiles of the rooms deployment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Profile {
        /// Full administrative access.
        Administrator = 1,
        /// Standard authenticated user.
        User = 2,
    }

    impl super::ProfileCode for Profile {
        fn code(self) -> i32 {
            self as i32
        }
    }

    /// Permissions of the rooms deployment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Permission {
        /// Manage the whole system.
        ManageSystem = 1,
        /// Edit the caller's own profile.
        EditOwnProfile = 2,
        /// Open a new room.
        CreateRoom = 3,
    }

    impl super::PermissionCode for Permission {
        fn code(self) -> i32 {
            self as i32
        }
    }
}
