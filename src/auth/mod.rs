pub mod cookie;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendClient, BackendError, BackendUser};
use crate::config::{RolePolicy, MAX_SESSION_TTL_HOURS};

/// Role claim carried by a session. Anything the backend sends other than `admin` is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Other,
}

/// Verified session, signed into the session cookie as JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id
    pub sub: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Backend bearer token used for write requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Session {
    pub fn new(user: &BackendUser, access_token: Option<String>, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(ttl_hours.min(MAX_SESSION_TTL_HOURS) as i64)).timestamp();

        Self {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            access_token,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn permits(&self, policy: RolePolicy) -> bool {
        match policy {
            RolePolicy::AdminOnly => self.is_admin(),
            RolePolicy::AnyAuthenticated => true,
        }
    }

    pub fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter your email and password")]
    MissingCredentials,
    #[error("{0}")]
    Rejected(String),
    #[error("Only admin users can access this dashboard")]
    NotAdmin,
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("session secret not configured")]
    InvalidSecret,
}

/// HS256 keys derived once from the configured session secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn issue(&self, session: &Session) -> Result<String, AuthError> {
        Ok(encode(&Header::new(Algorithm::HS256), session, &self.encoding)?)
    }

    /// Verify signature and expiry and return the session claims
    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Session>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Exchange credentials with the backend and build a session for the returned user.
///
/// Under `AdminOnly` a non-admin account is refused here, otherwise the guard would bounce the
/// user straight back to the login page.
pub async fn authenticate(
    backend: &BackendClient,
    email: &str,
    password: &str,
    policy: RolePolicy,
    ttl_hours: u64,
) -> Result<Session, AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let login = backend.login(email, password).await.map_err(|e| match e {
        BackendError::Api { message, .. } => AuthError::Rejected(message),
        other => {
            tracing::warn!("credential exchange failed: {}", other);
            AuthError::Rejected(other.user_message("Authentication failed"))
        }
    })?;

    let session = Session::new(&login.user, login.token, ttl_hours);
    if !session.permits(policy) {
        tracing::info!(email = %session.email, "refusing non-admin login");
        return Err(AuthError::NotAdmin);
    }

    tracing::info!(email = %session.email, "user signed in");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> BackendUser {
        BackendUser {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
            phone_number: None,
            profile_image: None,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let keys = SessionKeys::new("secret").unwrap();
        let session = Session::new(&user(Role::Admin), Some("backend-token".into()), 1);

        let token = keys.issue(&session).unwrap();
        let verified = keys.verify(&token).unwrap();

        assert_eq!(verified.sub, "u1");
        assert_eq!(verified.role, Role::Admin);
        assert_eq!(verified.bearer(), Some("backend-token"));
    }

    #[test]
    fn test_oversized_ttl_is_capped() {
        let session = Session::new(&user(Role::Admin), None, u64::MAX);
        let cap = (MAX_SESSION_TTL_HOURS * 3600) as i64;
        assert!(session.exp > session.iat);
        assert!(session.exp - session.iat <= cap);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let session = Session::new(&user(Role::Admin), None, 1);
        let token = SessionKeys::new("one").unwrap().issue(&session).unwrap();

        assert!(SessionKeys::new("two").unwrap().verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let keys = SessionKeys::new("secret").unwrap();
        let mut session = Session::new(&user(Role::Admin), None, 1);
        session.exp = Utc::now().timestamp() - 10;

        let token = keys.issue(&session).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_role_policy() {
        let admin = Session::new(&user(Role::Admin), None, 1);
        let other = Session::new(&user(Role::Other), None, 1);

        assert!(admin.permits(RolePolicy::AdminOnly));
        assert!(!other.permits(RolePolicy::AdminOnly));
        assert!(other.permits(RolePolicy::AnyAuthenticated));
    }

    #[test]
    fn test_unknown_role_is_other() {
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Other);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(SessionKeys::new("  "), Err(AuthError::InvalidSecret)));
    }
}
