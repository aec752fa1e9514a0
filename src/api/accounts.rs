// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Account endpoints (tenant-scoped).
//!
//! By the time a handler here runs, the scoping middleware has already
//! verified the caller's membership and bound the account to the request
//! context; handlers read the context instead of trusting any input.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AccountSummary, MemberResponse, PageQuery, Paginated};
use crate::state::AppState;
use crate::storage::{MembershipRepository, UserRepository};
use crate::tenancy::current_tenant;

/// Get the account the request is scoped to.
#[utoipa::path(
    get,
    path = "/v1/orgs/{org_id}",
    tag = "Accounts",
    security(("bearer" = [])),
    params(("org_id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "The active account", body = AccountSummary),
        (status = 401, description = "Not a member of this account"),
    )
)]
pub async fn get_account() -> Result<Json<AccountSummary>, ApiError> {
    let Some(account) = current_tenant() else {
        tracing::error!("scoped route reached with empty tenant context");
        return Err(ApiError::internal());
    };
    Ok(Json(account.into()))
}

/// List the active account's members.
#[utoipa::path(
    get,
    path = "/v1/orgs/{org_id}/members",
    tag = "Accounts",
    security(("bearer" = [])),
    params(("org_id" = Uuid, Path, description = "Account id"), PageQuery),
    responses(
        (status = 200, description = "Members of the active account", body = Paginated<MemberResponse>),
        (status = 401, description = "Not a member of this account"),
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<MemberResponse>>, ApiError> {
    let memberships = MembershipRepository::new(&state.store).list_scoped()?;

    let users = UserRepository::new(&state.store);
    let mut members = Vec::new();
    for membership in memberships {
        if let Some(user) = users.find(membership.user_id)? {
            members.push(MemberResponse::from_parts(membership, user));
        }
    }
    members.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));

    let base_path = format!("/v1/orgs/{org_id}/members");
    Ok(Json(Paginated::paginate(members, &query, &base_path)))
}
