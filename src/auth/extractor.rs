// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Axum extractors for authenticated callers.
//!
//! Handlers on unscoped routes enforce their own authorization with the
//! `Auth` extractor; the scoping middleware deliberately lets anonymous
//! requests through to them.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is AuthenticatedIdentity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::state::AppState;

use super::verifier::verify_bearer;
use super::{AuthError, AuthenticatedIdentity};

/// Extractor requiring an authenticated caller.
///
/// Prefers the identity the scoping middleware already placed in request
/// extensions; verifies the bearer credential itself otherwise (e.g. in
/// handler unit tests that bypass the middleware).
pub struct Auth(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<AuthenticatedIdentity>().cloned() {
            return Ok(Auth(identity));
        }

        let identity = verify_bearer(&parts.headers, state).await?;
        Ok(Auth(identity))
    }
}

/// Optional authentication extractor.
///
/// Yields `None` instead of rejecting when no valid credential is present.
pub struct OptionalAuth(pub Option<AuthenticatedIdentity>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(identity)) => Ok(OptionalAuth(Some(identity))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{dev_jwt, seeded_state};
    use axum::http::Request;

    fn parts_for(uri: &str, token: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_requires_a_credential() {
        let (state, _fixture, _temp) = seeded_state();
        let mut parts = parts_for("/test", None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_verifies_a_bearer_token() {
        let (state, fixture, _temp) = seeded_state();
        let token = dev_jwt(fixture.user_id);
        let mut parts = parts_for("/test", Some(&token));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, fixture.user_id);
    }

    #[tokio::test]
    async fn auth_prefers_middleware_extensions() {
        let (state, fixture, _temp) = seeded_state();
        let mut parts = parts_for("/test", None);
        parts.extensions.insert(fixture.identity());

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.user_id, fixture.user_id);
    }

    #[tokio::test]
    async fn optional_auth_is_none_for_anonymous() {
        let (state, _fixture, _temp) = seeded_state();
        let mut parts = parts_for("/test", Some("garbage"));

        let result = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(result.0.is_none());
    }
}
