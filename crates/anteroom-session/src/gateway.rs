//! Identity gateway — the HTTP boundary to the external login flow.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};

use anteroom_core::{BearerToken, Identity};

use crate::error::{GatewayError, GatewayResult};

const LOGIN_URL_PATH: &str = "/api/v1/security/login-url";
const TOKEN_PATH: &str = "/api/v1/security/token";
const IDENTITY_PATH: &str = "/api/v1/security/identity";

/// Operations of the redirect-based login flow.
///
/// Implementors expose the three calls the session controller needs: the
/// login redirect URL, the authorization code/state exchange, and the
/// identity fetch for a bearer token. The token travels as an explicit
/// argument — there is no ambient "bound credential" state.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// URL to navigate to in order to begin the external login flow.
    async fn login_url(&self, state: Option<&str>) -> GatewayResult<String>;

    /// Exchange an authorization code and state for a bearer token.
    ///
    /// A rejected exchange is an error, never an empty success.
    async fn exchange(&self, code: &str, state: &str) -> GatewayResult<BearerToken>;

    /// Fetch the identity record bound to `token`.
    ///
    /// A rejected or expired token surfaces as
    /// [`GatewayError::TokenRejected`], not as a null payload.
    async fn fetch_identity(&self, token: &BearerToken) -> GatewayResult<Identity>;
}

#[derive(Debug, Deserialize)]
struct LoginUrlResponse {
    #[serde(rename = "loginUrl")]
    login_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    jwt: String,
}

#[derive(Debug, Deserialize)]
struct IdentityEnvelope {
    payload: Option<Identity>,
}

/// Configuration for the HTTP identity gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the backing API, scheme and host only.
    pub base_url: String,
    /// Per-request timeout. `None` leaves the client default.
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Create a config for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP implementation of [`IdentityGateway`].
pub struct HttpIdentityGateway {
    client: Client,
    base_url: String,
}

impl HttpIdentityGateway {
    /// Create a gateway from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] when the base URL does not
    /// parse, or [`GatewayError::Http`] when the client cannot be built.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| GatewayError::InvalidBaseUrl(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %body, "identity gateway error");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::TokenRejected {
                status: status.as_u16(),
            });
        }
        Err(GatewayError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn login_url(&self, state: Option<&str>) -> GatewayResult<String> {
        debug!("fetching login url");
        let mut request = self.client.get(self.endpoint(LOGIN_URL_PATH));
        if let Some(state) = state {
            request = request.query(&[("state", state)]);
        }
        let response = Self::check(request.send().await?).await?;
        let body: LoginUrlResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(body.login_url)
    }

    async fn exchange(&self, code: &str, state: &str) -> GatewayResult<BearerToken> {
        debug!("exchanging authorization code");
        let response = self
            .client
            .post(self.endpoint(TOKEN_PATH))
            .query(&[("code", code), ("state", state)])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        Ok(BearerToken::new(body.jwt))
    }

    async fn fetch_identity(&self, token: &BearerToken) -> GatewayResult<Identity> {
        debug!("fetching identity");
        let mut bearer = HeaderValue::try_from(format!("Bearer {}", token.as_str()))
            .map_err(|e| GatewayError::InvalidCredential(e.to_string()))?;
        bearer.set_sensitive(true);

        let response = self
            .client
            .get(self.endpoint(IDENTITY_PATH))
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let envelope: IdentityEnvelope = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        envelope
            .payload
            .ok_or_else(|| GatewayError::MalformedResponse("identity payload missing".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config =
            GatewayConfig::new("https://api.example.com").timeout(Duration::from_secs(10));
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let result = HttpIdentityGateway::new(GatewayConfig::new("not a url"));
        assert!(matches!(result, Err(GatewayError::InvalidBaseUrl(_))));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let gateway = HttpIdentityGateway::new(GatewayConfig::new("https://api.example.com/"))
            .unwrap();
        assert_eq!(
            gateway.endpoint(IDENTITY_PATH),
            "https://api.example.com/api/v1/security/identity"
        );
    }

    #[test]
    fn identity_envelope_unwraps_payload() {
        let json = r#"{
            "payload": {
                "personId": "p1",
                "email": "a@example.com",
                "firstName": "A",
                "lastName": "B",
                "profileCode": 1,
                "profileName": "Administrator",
                "permissionCodes": [1]
            }
        }"#;
        let envelope: IdentityEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.payload.unwrap().profile_code, 1);
    }

    #[test]
    fn identity_envelope_without_payload_reads_as_absent() {
        let envelope: IdentityEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.payload.is_none());
    }

    #[test]
    fn token_response_uses_the_jwt_field() {
        let body: TokenResponse = serde_json::from_str(r#"{"jwt": "abc"}"#).unwrap();
        assert_eq!(body.jwt, "abc");
    }

    #[test]
    fn login_url_response_uses_the_camel_case_field() {
        let body: LoginUrlResponse =
            serde_json::from_str(r#"{"loginUrl": "https://sso.example/auth"}"#).unwrap();
        assert_eq!(body.login_url, "https://sso.example/auth");
    }
}
