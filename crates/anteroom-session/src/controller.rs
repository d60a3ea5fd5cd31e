//! Session controller — owner of the token/identity lifecycle.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use anteroom_core::{BearerToken, Identity, PermissionCode, ProfileCode};
use anteroom_store::{CredentialStore, IdentityCache};

use crate::error::{SessionError, SessionResult};
use crate::gateway::IdentityGateway;

/// Store key reserved for the bearer token.
pub const TOKEN_KEY: &str = "jwt";

/// Store key reserved for the cached identity record.
pub const IDENTITY_KEY: &str = "identity";

/// Client-resident session state machine.
///
/// Construct one controller at process start and share it by [`Arc`]; guards
/// and API callers hold a handle rather than reaching for globals.
///
/// Two invariants hold after every public operation:
///
/// - a cached identity implies a stored token (the token that produced it),
/// - a failure while resolving an identity removes the token and the cached
///   record together, never one without the other.
///
/// The token and the identity are created together (login callback, or a
/// successful start-up re-hydration) and destroyed together (logout, or a
/// refresh failure). Neither is patched in place; a refresh replaces the
/// cached record wholesale or deletes it.
pub struct SessionController {
    gateway: Arc<dyn IdentityGateway>,
    credentials: Arc<dyn CredentialStore>,
    cache: Arc<dyn IdentityCache>,
    /// Serializes refreshes so concurrent callers ride one in-flight fetch.
    refresh_gate: Mutex<()>,
}

impl SessionController {
    /// Create a controller over the given gateway and stores.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        credentials: Arc<dyn CredentialStore>,
        cache: Arc<dyn IdentityCache>,
    ) -> Self {
        Self {
            gateway,
            credentials,
            cache,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Wrap in an [`Arc`] for sharing with guards and callers.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Re-hydrate session state on process start.
    ///
    /// Reads the stored token. When absent, the session stays
    /// unauthenticated and no network call is made. When present, the
    /// identity is refreshed; a refresh failure quietly resolves to the
    /// unauthenticated state. This method never fails, so it is safe to call
    /// unconditionally on every start, stale or revoked token included.
    pub async fn initialize(&self) {
        let Some(token) = self.stored_token() else {
            debug!("no stored credential, starting unauthenticated");
            return;
        };
        self.refresh_identity(&token).await;
    }

    /// Complete the external login flow with the callback's code and state.
    ///
    /// On a successful exchange the token is persisted and the identity
    /// refreshed. A refresh failure after a successful exchange is absorbed
    /// like every other refresh failure.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Exchange`] when the gateway rejects the
    /// code/state pair — the stores are left untouched, the token is never
    /// written before the exchange succeeds. Returns [`SessionError::Store`]
    /// when the exchanged token cannot be persisted; the identity is not
    /// cached in that case.
    pub async fn process_login_callback(&self, code: &str, state: &str) -> SessionResult<()> {
        let token = self
            .gateway
            .exchange(code, state)
            .await
            .map_err(SessionError::Exchange)?;
        self.credentials.set(TOKEN_KEY, token.as_str())?;
        self.refresh_identity(&token).await;
        Ok(())
    }

    /// URL to navigate to in order to begin the external login flow.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Gateway`] when the gateway call fails.
    pub async fn login_url(&self, state: Option<&str>) -> SessionResult<String> {
        Ok(self.gateway.login_url(state).await?)
    }

    /// Refresh the cached identity for `token`.
    ///
    /// All failures are absorbed: on any error (network, rejected token,
    /// malformed payload, cache write) the token and the cached identity are
    /// removed together and the session resolves to unauthenticated. The
    /// store mutation happens strictly after the gateway response and
    /// completes before this method returns.
    async fn refresh_identity(&self, token: &BearerToken) {
        let _flight = self.refresh_gate.lock().await;

        // A refresh that completed while we waited on the gate has already
        // cached the identity for this token; skip the duplicate fetch.
        if self.get_identity().is_some() && self.stored_token().as_ref() == Some(token) {
            debug!("identity already refreshed for this credential");
            return;
        }

        match self.gateway.fetch_identity(token).await {
            Ok(identity) => {
                let record = match serde_json::to_value(&identity) {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(error = %err, "identity not serializable, clearing session");
                        self.clear_session();
                        return;
                    },
                };
                if let Err(err) = self.cache.set_item(IDENTITY_KEY, record) {
                    warn!(error = %err, "identity cache write failed, clearing session");
                    self.clear_session();
                    return;
                }
                debug!(profile = identity.profile_code, "identity refreshed");
            },
            Err(err) => {
                warn!(error = %err, "identity refresh failed, clearing session");
                self.clear_session();
            },
        }
    }

    /// The cached identity, when the session is authenticated.
    ///
    /// Pure cache read: no network access, no side effects. A store error or
    /// an undecodable record reads as absent.
    #[must_use]
    pub fn get_identity(&self) -> Option<Identity> {
        let record = self.cache.get_item(IDENTITY_KEY).ok().flatten()?;
        serde_json::from_value(record).ok()
    }

    /// Whether a resolved identity is currently cached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get_identity().is_some()
    }

    /// Whether the cached identity carries exactly the given profile.
    ///
    /// Absent identity reads as `false`. Comparison is by integer code.
    #[must_use]
    pub fn has_profile<P: ProfileCode>(&self, profile: P) -> bool {
        self.get_identity()
            .is_some_and(|identity| identity.profile_code == profile.code())
    }

    /// Whether the cached identity carries any of the given profiles.
    #[must_use]
    pub fn has_any_profile<P: ProfileCode>(&self, profiles: &[P]) -> bool {
        let Some(identity) = self.get_identity() else {
            return false;
        };
        profiles.iter().any(|p| identity.profile_code == p.code())
    }

    /// Whether the cached identity holds the given permission.
    ///
    /// Absent identity reads as `false`. Comparison is by integer code.
    #[must_use]
    pub fn has_permission<P: PermissionCode>(&self, permission: P) -> bool {
        self.get_identity()
            .is_some_and(|identity| identity.has_permission_code(permission.code()))
    }

    /// Whether the cached identity holds any of the given permissions.
    #[must_use]
    pub fn has_any_permission<P: PermissionCode>(&self, permissions: &[P]) -> bool {
        let Some(identity) = self.get_identity() else {
            return false;
        };
        permissions
            .iter()
            .any(|p| identity.has_permission_code(p.code()))
    }

    /// Drop the credential and the cached identity.
    ///
    /// Idempotent: logging out of an unauthenticated session is a no-op.
    pub fn logout(&self) {
        self.clear_session();
    }

    fn stored_token(&self) -> Option<BearerToken> {
        self.credentials
            .get(TOKEN_KEY)
            .ok()
            .flatten()
            .map(BearerToken::new)
    }

    /// Remove token and cached identity together. Store errors are logged
    /// and ignored; teardown never propagates.
    fn clear_session(&self) {
        if let Err(err) = self.credentials.remove(TOKEN_KEY) {
            warn!(error = %err, "credential remove failed");
        }
        if let Err(err) = self.cache.remove(IDENTITY_KEY) {
            warn!(error = %err, "identity cache remove failed");
        }
    }
}
