// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Identity verification.
//!
//! Turns an inbound bearer credential into an active caller identity, or
//! fails with an `Unauthenticated`-class error. Verification is read-only:
//! one JWT decode plus one identity-store lookup.
//!
//! ## Verification Modes
//!
//! - **Production** (`AUTH_JWKS_URL` set): full signature verification
//!   against the IdP's JWKS
//! - **Development** (no JWKS configured): structure and expiry checks only,
//!   no signature verification

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, Validation};
use uuid::Uuid;

use crate::state::{AppState, AuthConfig};
use crate::storage::{StorageError, UserRepository};

use super::claims::{AuthAttempt, AuthenticatedIdentity, JwtClaims};
use super::error::AuthError;
use super::jwks::JwksManager;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Run one authentication attempt, yielding a tagged outcome.
///
/// A missing or failing credential is the expected anonymous case, not an
/// error; the failure reason is logged at debug level and the request is
/// left anonymous. Route-level policy decides what anonymity means.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> AuthAttempt {
    match verify_bearer(headers, state).await {
        Ok(identity) => AuthAttempt::Authenticated(identity),
        Err(err) => {
            tracing::debug!(code = err.error_code(), "request is anonymous");
            AuthAttempt::Anonymous
        }
    }
}

/// Verify the request's bearer credential into an active caller identity.
pub async fn verify_bearer(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthenticatedIdentity, AuthError> {
    let token = bearer_token(headers)?;
    let claims = decode_claims(token, &state.auth).await?;
    lookup_identity(&claims, state)
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Decode and validate the JWT.
async fn decode_claims(token: &str, auth: &AuthConfig) -> Result<JwtClaims, AuthError> {
    if let Some(jwks) = &auth.jwks {
        decode_claims_verified(token, jwks, auth).await
    } else {
        decode_claims_insecure(token)
    }
}

/// Production JWT verification with JWKS.
async fn decode_claims_verified(
    token: &str,
    jwks: &JwksManager,
    auth: &AuthConfig,
) -> Result<JwtClaims, AuthError> {
    let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    let (decoding_key, algorithm) = if let Some(kid) = &header.kid {
        jwks.get_decoding_key(kid).await?
    } else {
        jwks.get_any_decoding_key().await?
    };

    let mut validation = Validation::new(algorithm);
    validation.leeway = CLOCK_SKEW_LEEWAY;

    if let Some(issuer) = &auth.issuer {
        validation.set_issuer(&[issuer]);
    }

    if let Some(audience) = &auth.audience {
        validation.set_audience(&[audience]);
    } else {
        validation.validate_aud = false;
    }

    let token_data =
        decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            jsonwebtoken::errors::ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        })?;

    Ok(token_data.claims)
}

/// Development JWT verification (no signature check).
///
/// WARNING: only reachable when no JWKS endpoint is configured.
fn decode_claims_insecure(token: &str) -> Result<JwtClaims, AuthError> {
    let token_data = jsonwebtoken::dangerous::insecure_decode::<JwtClaims>(token)
        .map_err(|_| AuthError::MalformedToken)?;

    let claims = token_data.claims;

    // Expiry still applies in development mode.
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    if claims.exp > 0 && claims.exp < now - CLOCK_SKEW_LEEWAY as i64 {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Resolve the token's subject against the identity store.
///
/// Deactivated users are rejected here, so a still-valid token stops working
/// the moment its user is deactivated.
fn lookup_identity(
    claims: &JwtClaims,
    state: &AppState,
) -> Result<AuthenticatedIdentity, AuthError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::UnknownIdentity)?;

    let user = UserRepository::new(&state.store)
        .find(user_id)
        .map_err(|e| match e {
            StorageError::NotFound(_) => AuthError::UnknownIdentity,
            other => AuthError::InternalError(other.to_string()),
        })?
        .ok_or(AuthError::UnknownIdentity)?;

    if !user.is_active {
        return Err(AuthError::IdentityDisabled);
    }

    Ok(AuthenticatedIdentity::from_user(user, claims))
}
