// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Membership resolution.
//!
//! Given a verified caller and the account id taken from the URL path (the
//! only trusted source for it), decide whether the caller may be scoped into
//! that account. Pure read; the caller folds every failure into one generic
//! response.

use uuid::Uuid;

use crate::auth::AuthenticatedIdentity;
use crate::state::AppState;
use crate::storage::{AccountRepository, MembershipRepository};

use super::context::ActiveTenancy;
use super::error::TenancyError;

/// Resolve the caller's membership in the account named by the request path.
///
/// Fails with `NotAMember` when the id is not well-formed, the account does
/// not exist, or no non-archived membership binds the caller to it; fails
/// with `TenantInactive` when the account is archived or disabled.
pub fn resolve(
    state: &AppState,
    identity: &AuthenticatedIdentity,
    raw_account_id: &str,
) -> Result<ActiveTenancy, TenancyError> {
    let account_id = Uuid::parse_str(raw_account_id).map_err(|_| TenancyError::NotAMember)?;

    let membership = MembershipRepository::new(&state.store)
        .find_active(identity.user_id, account_id)?
        .ok_or(TenancyError::NotAMember)?;

    let account = AccountRepository::new(&state.store)
        .find(account_id)?
        .ok_or(TenancyError::NotAMember)?;

    if !account.accepts_scoping() {
        return Err(TenancyError::TenantInactive);
    }

    Ok(ActiveTenancy {
        account,
        membership,
    })
}
