//! Navigation guards — predicate adapters for the routing collaborator.
//!
//! A guard is invoked with a navigation target and a required capability and
//! answers with a [`GuardDecision`]: pass the target through unchanged, or
//! divert to the configured fallback route. Guards only read the session
//! controller's synchronous predicates — no network and no async work
//! happens at navigation time, so a guard resolves within one scheduling
//! tick.

use std::sync::Arc;

use anteroom_core::{PermissionCode, ProfileCode};

use crate::controller::SessionController;

/// Redirect descriptor returned when a guard denies navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Name of the route to redirect to.
    pub name: String,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision<T> {
    /// Navigation may proceed to the original target.
    Allow(T),
    /// Navigation is diverted to the fallback route.
    Redirect(RedirectTarget),
}

impl<T> GuardDecision<T> {
    /// Check if this decision allows the navigation.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Check if this decision redirects the navigation.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

/// Predicate adapters consumed by the router's before-enter hooks.
///
/// Four shapes: single profile, any-of profile list, single permission,
/// any-of permission list. Each takes the navigation target and returns it
/// unchanged on allow.
pub struct NavigationGuards {
    session: Arc<SessionController>,
    fallback: String,
}

impl NavigationGuards {
    /// Create guards over `session`, diverting denials to the `fallback`
    /// route name.
    #[must_use]
    pub fn new(session: Arc<SessionController>, fallback: impl Into<String>) -> Self {
        Self {
            session,
            fallback: fallback.into(),
        }
    }

    /// Allow when the session carries exactly `profile`.
    pub fn require_profile<T, P: ProfileCode>(&self, to: T, profile: P) -> GuardDecision<T> {
        if self.session.has_profile(profile) {
            GuardDecision::Allow(to)
        } else {
            self.deny()
        }
    }

    /// Allow when the session carries any profile in `profiles`.
    pub fn require_any_profile<T, P: ProfileCode>(
        &self,
        to: T,
        profiles: &[P],
    ) -> GuardDecision<T> {
        if self.session.has_any_profile(profiles) {
            GuardDecision::Allow(to)
        } else {
            self.deny()
        }
    }

    /// Allow when the session holds `permission`.
    pub fn require_permission<T, P: PermissionCode>(
        &self,
        to: T,
        permission: P,
    ) -> GuardDecision<T> {
        if self.session.has_permission(permission) {
            GuardDecision::Allow(to)
        } else {
            self.deny()
        }
    }

    /// Allow when the session holds any permission in `permissions`.
    pub fn require_any_permission<T, P: PermissionCode>(
        &self,
        to: T,
        permissions: &[P],
    ) -> GuardDecision<T> {
        if self.session.has_any_permission(permissions) {
            GuardDecision::Allow(to)
        } else {
            self.deny()
        }
    }

    fn deny<T>(&self) -> GuardDecision<T> {
        GuardDecision::Redirect(RedirectTarget {
            name: self.fallback.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use anteroom_core::access::publishing;
    use anteroom_core::{BearerToken, Identity};
    use anteroom_store::{CredentialStore, IdentityCache, MemoryCredentialStore, MemoryIdentityCache};

    use super::*;
    use crate::controller::{IDENTITY_KEY, TOKEN_KEY};
    use crate::error::{GatewayError, GatewayResult};
    use crate::gateway::IdentityGateway;

    /// Gateway double that fails every call; guards must never reach it.
    struct UnreachableGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityGateway for UnreachableGateway {
        async fn login_url(&self, _state: Option<&str>) -> GatewayResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::MalformedResponse("unreachable".to_string()))
        }

        async fn exchange(&self, _code: &str, _state: &str) -> GatewayResult<BearerToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::MalformedResponse("unreachable".to_string()))
        }

        async fn fetch_identity(&self, _token: &BearerToken) -> GatewayResult<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GatewayError::MalformedResponse("unreachable".to_string()))
        }
    }

    /// Navigation target stand-in; guards must hand it back untouched.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Route {
        name: &'static str,
        path: &'static str,
    }

    fn authenticated_guards() -> (NavigationGuards, Arc<UnreachableGateway>) {
        let gateway = Arc::new(UnreachableGateway {
            calls: AtomicUsize::new(0),
        });
        let credentials = MemoryCredentialStore::new().shared();
        let cache = MemoryIdentityCache::new().shared();

        let identity = Identity {
            person_id: "p-1".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Ray".to_string(),
            profile_code: 2,
            profile_name: "Publisher".to_string(),
            permission_codes: BTreeSet::from([2, 4, 5]),
            entity_id: None,
            entity_handle: None,
        };
        credentials.set(TOKEN_KEY, "jwt-1").unwrap();
        cache
            .set_item(IDENTITY_KEY, serde_json::to_value(&identity).unwrap())
            .unwrap();

        let controller =
            SessionController::new(gateway.clone(), credentials, cache).shared();
        (NavigationGuards::new(controller, "homePage"), gateway)
    }

    #[test]
    fn allow_passes_the_target_through_unchanged() {
        let (guards, _) = authenticated_guards();
        let target = Route {
            name: "newPublicationPage",
            path: "/publication/new",
        };

        let decision = guards.require_permission(target.clone(), publishing::Permission::Publish);
        assert_eq!(decision, GuardDecision::Allow(target));
    }

    #[test]
    fn denial_redirects_to_the_fallback_route() {
        let (guards, _) = authenticated_guards();
        let target = Route {
            name: "categoriesPage",
            path: "/admin/categories",
        };

        let decision =
            guards.require_permission(target, publishing::Permission::ManageSystem);
        assert_eq!(
            decision,
            GuardDecision::Redirect(RedirectTarget {
                name: "homePage".to_string(),
            })
        );
        assert!(decision.is_redirect());
    }

    #[test]
    fn profile_guards_check_the_single_profile_code() {
        let (guards, _) = authenticated_guards();

        assert!(guards
            .require_profile("target", publishing::Profile::Publisher)
            .is_allowed());
        assert!(guards
            .require_profile("target", publishing::Profile::Administrator)
            .is_redirect());
        assert!(guards
            .require_any_profile(
                "target",
                &[publishing::Profile::Administrator, publishing::Profile::Publisher],
            )
            .is_allowed());
    }

    #[test]
    fn any_permission_guard_matches_any_member() {
        let (guards, _) = authenticated_guards();

        assert!(guards
            .require_any_permission(
                "target",
                &[publishing::Permission::ManageSystem, publishing::Permission::Comment],
            )
            .is_allowed());
        assert!(guards
            .require_any_permission(
                "target",
                &[publishing::Permission::ManageSystem, publishing::Permission::EditAllPublications],
            )
            .is_redirect());
    }

    #[test]
    fn guards_never_touch_the_gateway() {
        let (guards, gateway) = authenticated_guards();

        let _ = guards.require_permission("a", publishing::Permission::Publish);
        let _ = guards.require_any_permission("b", &[publishing::Permission::Comment]);
        let _ = guards.require_profile("c", publishing::Profile::Publisher);
        let _ = guards.require_any_profile("d", &[publishing::Profile::User]);

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }
}
