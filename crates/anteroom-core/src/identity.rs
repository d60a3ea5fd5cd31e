//! The resolved user identity cached by the session controller.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The user record resolved from a bearer credential.
///
/// An `Identity` is a cached derivative of the stored token: the identity
/// endpoint produces it, the session controller caches it for the lifetime
/// of the session, and it is never authoritative over the server. Display
/// and authorization checks read it; nothing mutates it in place — a refresh
/// replaces it wholesale or removes it.
///
/// Wire names are camelCase, matching the gateway. `profileCode`,
/// `permissionCodes` and the other non-optional fields are required: a
/// payload missing any of them fails deserialization, which downstream code
/// treats as a failed identity fetch rather than guessing a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable identifier of the person.
    pub person_id: String,
    /// Primary email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Code of the single profile attached to this identity.
    pub profile_code: i32,
    /// Human-readable name of the profile.
    pub profile_name: String,
    /// Capability codes granted to this identity.
    pub permission_codes: BTreeSet<i32>,
    /// Identifier of the owned entity, for profiles that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Public handle of the owned entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_handle: Option<String>,
}

impl Identity {
    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this identity carries the given raw permission code.
    #[must_use]
    pub fn has_permission_code(&self, code: i32) -> bool {
        self.permission_codes.contains(&code)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.email, self.profile_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_record() {
        let json = r#"{
            "personId": "64f1c9",
            "email": "alice@example.com",
            "firstName": "Alice",
            "lastName": "Ray",
            "profileCode": 2,
            "profileName": "Publisher",
            "permissionCodes": [2, 4, 5],
            "entityId": "a11ce",
            "entityHandle": "alice"
        }"#;

        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.person_id, "64f1c9");
        assert_eq!(identity.profile_code, 2);
        assert!(identity.has_permission_code(4));
        assert!(!identity.has_permission_code(1));
        assert_eq!(identity.entity_handle.as_deref(), Some("alice"));
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let json = r#"{
            "personId": "64f1c9",
            "email": "bob@example.com",
            "firstName": "Bob",
            "lastName": "Lee",
            "profileCode": 3,
            "profileName": "User",
            "permissionCodes": []
        }"#;

        let identity: Identity = serde_json::from_str(json).unwrap();
        assert!(identity.entity_id.is_none());
        assert!(identity.entity_handle.is_none());
        assert!(identity.permission_codes.is_empty());
    }

    #[test]
    fn missing_profile_code_is_rejected() {
        let json = r#"{
            "personId": "64f1c9",
            "email": "bob@example.com",
            "firstName": "Bob",
            "lastName": "Lee",
            "profileName": "User",
            "permissionCodes": []
        }"#;

        assert!(serde_json::from_str::<Identity>(json).is_err());
    }

    #[test]
    fn duplicate_codes_collapse_into_the_set() {
        let json = r#"{
            "personId": "1",
            "email": "x@example.com",
            "firstName": "X",
            "lastName": "Y",
            "profileCode": 1,
            "profileName": "Administrator",
            "permissionCodes": [1, 1, 3]
        }"#;

        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.permission_codes.len(), 2);
    }

    #[test]
    fn display_avoids_person_fields() {
        let identity = Identity {
            person_id: "64f1c9".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Ray".to_string(),
            profile_code: 1,
            profile_name: "Administrator".to_string(),
            permission_codes: BTreeSet::from([1]),
            entity_id: None,
            entity_handle: None,
        };
        assert_eq!(identity.to_string(), "alice@example.com (Administrator)");
    }
}
