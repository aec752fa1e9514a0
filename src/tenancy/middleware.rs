// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Request scoping middleware.
//!
//! Runs for every matched route, between the raw request and the handler:
//!
//! 1. Reject edge-denied HTTP methods (405) before any auth work
//! 2. Run the identity verifier once; anonymity is a normal outcome
//! 3. Routes without an `org_id` path parameter proceed with an empty
//!    context whatever the auth outcome; their handlers authorize themselves
//! 4. Routes with an `org_id` require a verified caller and a resolvable
//!    membership; every failure collapses to the generic 401
//! 5. The handler runs inside its own task-local context cell, cleared
//!    unconditionally afterwards and destroyed with the request future on
//!    cancellation
//!
//! The middleware is the only writer of the tenant context.

use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{verifier, AuthAttempt};
use crate::state::AppState;

use super::context::{self, ActiveTenancy};
use super::error::TenancyError;
use super::resolver;

/// Route parameter naming the account a request is scoped to.
pub const ACCOUNT_PARAM: &str = "org_id";

/// The scoping interceptor. Layer with
/// `axum::middleware::from_fn_with_state(state, tenant_scope)`.
pub async fn tenant_scope(
    State(state): State<AppState>,
    params: RawPathParams,
    mut request: Request,
    next: Next,
) -> Response {
    if state.scoping.denied_methods.contains(request.method()) {
        return TenancyError::MethodNotAllowed.into_response();
    }

    let attempt = verifier::authenticate(request.headers(), &state).await;
    if let AuthAttempt::Authenticated(identity) = &attempt {
        request.extensions_mut().insert(identity.clone());
    }

    let path_account = params
        .iter()
        .find(|(name, _)| *name == ACCOUNT_PARAM)
        .map(|(_, value)| value.to_string());

    let tenancy = match path_account {
        None => None,
        Some(raw_account_id) => {
            let Some(identity) = attempt.identity() else {
                tracing::info!(path = %request.uri().path(), "anonymous request to scoped route");
                return TenancyError::NotAMember.into_response();
            };
            match resolver::resolve(&state, identity, &raw_account_id) {
                Ok(tenancy) => Some(tenancy),
                Err(err) => {
                    tracing::info!(
                        user_id = %identity.user_id,
                        path = %request.uri().path(),
                        %err,
                        "request scoping denied"
                    );
                    return err.into_response();
                }
            }
        }
    };

    run_scoped(tenancy, request, next).await
}

/// Run the handler inside its own context cell.
///
/// The explicit `clear()` covers every normal exit path; the scope itself
/// destroys the cell when the request future is dropped mid-flight.
async fn run_scoped(tenancy: Option<ActiveTenancy>, request: Request, next: Next) -> Response {
    context::scope(async move {
        if let Some(tenancy) = tenancy {
            context::set(tenancy);
        }
        let response = next.run(request).await;
        context::clear();
        response
    })
    .await
}
