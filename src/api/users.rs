// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! User endpoints.
//!
//! These routes carry no account id in the path, so the scoping middleware
//! lets anonymous requests through; the `Auth` extractor here is what
//! rejects them.

use axum::{extract::State, Json};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{AccountSummary, UserMeResponse};
use crate::state::AppState;
use crate::storage::{AccountRepository, MembershipRepository};

/// Get the current authenticated user's profile.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(identity): Auth) -> Json<UserMeResponse> {
    Json(identity.into())
}

/// List the accounts the caller holds a non-archived membership in.
///
/// Archived or disabled accounts are omitted: the caller could not scope
/// into them anyway.
#[utoipa::path(
    get,
    path = "/v1/users/me/accounts",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's accounts", body = [AccountSummary]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_my_accounts(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountSummary>>, ApiError> {
    let memberships = MembershipRepository::new(&state.store).list_for_user(identity.user_id)?;

    let accounts_repo = AccountRepository::new(&state.store);
    let mut accounts = Vec::new();
    for membership in memberships {
        if let Some(account) = accounts_repo.find(membership.account_id)? {
            if account.accepts_scoping() {
                accounts.push(AccountSummary::from(account));
            }
        }
    }
    accounts.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(accounts))
}
