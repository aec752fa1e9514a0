// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! JWT claims and the authenticated caller representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::StoredUser;

/// Minimal claims decoded from a bearer JWT.
///
/// The identity provider issues standard OIDC claims; only the ones the
/// verifier actually reads are modeled here.
#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user id
    pub sub: String,
    /// Issued at timestamp
    #[serde(default)]
    #[allow(dead_code)]
    pub iat: i64,
    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,
    /// Issuer
    #[serde(default)]
    #[allow(dead_code)]
    pub iss: String,
    /// Session id, if the IdP issues one
    #[serde(default)]
    pub sid: Option<String>,
    /// Audience (validated by the jsonwebtoken crate, not read directly)
    #[serde(default)]
    #[allow(dead_code)]
    pub aud: Option<serde_json::Value>,
}

/// Verified caller identity.
///
/// Produced by the identity verifier after the token checked out AND the
/// subject resolved to an active user in the identity store. This is what
/// the scoping middleware hands to the membership resolver and what the
/// `Auth` extractor yields to handlers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedIdentity {
    /// Canonical user id (the token's `sub` claim)
    pub user_id: Uuid,
    /// Email address from the identity store
    pub email: String,
    /// Display name from the identity store
    pub full_name: String,
    /// Profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Session id (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Token expiration (Unix timestamp, used for logging, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedIdentity {
    /// Combine the stored user with the token's session claims.
    pub fn from_user(user: StoredUser, claims: &JwtClaims) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            profile_pic: user.profile_pic,
            is_verified: user.is_verified,
            session_id: claims.sid.clone(),
            expires_at: claims.exp,
        }
    }
}

/// Outcome of one credential-verification attempt.
///
/// A missing or bad credential is an expected case, not an exception: on
/// routes without a path account id the request simply proceeds anonymously
/// and handler-level authorization decides.
#[derive(Debug, Clone)]
pub enum AuthAttempt {
    /// The bearer credential resolved to an active user
    Authenticated(AuthenticatedIdentity),
    /// No credential, or verification failed
    Anonymous,
}

impl AuthAttempt {
    /// The identity, when authenticated.
    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            AuthAttempt::Authenticated(identity) => Some(identity),
            AuthAttempt::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AuthType;
    use chrono::Utc;

    fn sample_user() -> StoredUser {
        StoredUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            profile_pic: None,
            is_verified: true,
            is_active: true,
            auth_type: AuthType::Email,
            created_at: Utc::now(),
        }
    }

    fn sample_claims(sub: &str) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            iat: 1700000000,
            exp: 1700003600,
            iss: "https://idp.example.com".to_string(),
            sid: Some("sess_abc".to_string()),
            aud: None,
        }
    }

    #[test]
    fn from_user_combines_store_and_claims() {
        let user = sample_user();
        let user_id = user.id;
        let claims = sample_claims(&user_id.to_string());

        let identity = AuthenticatedIdentity::from_user(user, &claims);
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.session_id, Some("sess_abc".to_string()));
        assert_eq!(identity.expires_at, 1700003600);
    }

    #[test]
    fn attempt_identity_accessor() {
        let user = sample_user();
        let claims = sample_claims(&user.id.to_string());
        let attempt = AuthAttempt::Authenticated(AuthenticatedIdentity::from_user(user, &claims));
        assert!(attempt.identity().is_some());
        assert!(AuthAttempt::Anonymous.identity().is_none());
    }
}
