use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the backend access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Non-empty opaque credential sent with every backend request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(String);

impl BearerToken {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in logs via `?` formatting, so only the length is shown.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(<{} bytes>)", self.0.len())
    }
}

impl TryFrom<String> for BearerToken {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("bearer token must not be empty")
    }
}

impl From<BearerToken> for String {
    fn from(token: BearerToken) -> Self {
        token.0
    }
}

/// Profile reported by the identity provider for the signed-in browser user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityUser {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Public settings the browser needs to construct the identity provider client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityConfig {
    pub domain: String,
    pub client_id: String,
}

impl IdentityConfig {
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty() && !self.client_id.is_empty()
    }
}

/// Settings the browser fetches from the server at start-up.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicConfig {
    pub backend_url: String,
    pub identity: IdentityConfig,
}

impl PublicConfig {
    pub fn login_url(&self) -> String {
        backend_auth_url(&self.backend_url, AuthEndpoint::Login)
    }
}

/// The backend's session endpoints, reached by full-page navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEndpoint {
    Login,
    Logout,
}

pub fn backend_auth_url(backend_url: &str, endpoint: AuthEndpoint) -> String {
    let path = match endpoint {
        AuthEndpoint::Login => "login",
        AuthEndpoint::Logout => "logout",
    };
    format!("{}/auth/{path}", backend_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tokens_are_rejected() {
        assert!(BearerToken::new("").is_none());
        assert!(BearerToken::new("   ").is_none());
        assert_eq!(BearerToken::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn debug_output_hides_the_token() {
        let token = BearerToken::new("secret-value").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn deserializing_an_empty_token_fails() {
        assert!(serde_json::from_str::<BearerToken>(r#""""#).is_err());
        let token: BearerToken = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn auth_urls_hang_off_the_backend_root() {
        assert_eq!(
            backend_auth_url("http://backend.test/", AuthEndpoint::Logout),
            "http://backend.test/auth/logout"
        );
        let config = PublicConfig {
            backend_url: "http://backend.test".into(),
            identity: IdentityConfig::default(),
        };
        assert_eq!(config.login_url(), "http://backend.test/auth/login");
    }

    #[test]
    fn partial_identity_section_keeps_what_is_set() {
        let identity: IdentityConfig =
            serde_json::from_str(r#"{"domain":"naff.eu.auth0.com"}"#).unwrap();
        assert_eq!(identity.domain, "naff.eu.auth0.com");
        assert!(identity.client_id.is_empty());
        assert!(!identity.is_configured());
    }

    #[test]
    fn identity_user_tolerates_missing_profile_fields() {
        let user: IdentityUser = serde_json::from_str(r#"{"sub":"auth0|1"}"#).unwrap();
        assert_eq!(user.sub, "auth0|1");
        assert!(user.email.is_none());
    }
}
