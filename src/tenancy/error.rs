// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Tenancy errors and their HTTP shape.
//!
//! Everything that can go wrong while scoping a request into an account is
//! collapsed to one generic 401 body at the HTTP boundary: callers must not
//! be able to tell "no such account" from "you are not a member", which
//! would allow account enumeration. Only the method denylist gets its own
//! status since it carries nothing sensitive.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Errors raised while resolving and enforcing the account scope.
#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    /// The caller holds no non-archived membership in the account
    #[error("caller is not a member of the requested account")]
    NotAMember,
    /// The account itself is archived or disabled
    #[error("the requested account is archived or disabled")]
    TenantInactive,
    /// The HTTP method is denied at the edge, before any auth work
    #[error("method denied at the edge")]
    MethodNotAllowed,
    /// A store lookup failed mid-resolution; folded into the generic 401
    #[error("membership lookup failed: {0}")]
    Lookup(#[from] StorageError),
}

#[derive(Serialize)]
struct TenancyErrorBody {
    error: String,
}

impl IntoResponse for TenancyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TenancyError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }
            // One body for every scoping failure.
            TenancyError::NotAMember | TenancyError::TenantInactive => {
                (StatusCode::UNAUTHORIZED, "Not Authorized")
            }
            TenancyError::Lookup(cause) => {
                tracing::warn!(%cause, "membership lookup failed; responding 401");
                (StatusCode::UNAUTHORIZED, "Not Authorized")
            }
        };
        let body = Json(TenancyErrorBody {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}
