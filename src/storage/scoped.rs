// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Account-scope enforcement for all tenant-owned storage operations.
//!
//! Every read of a tenant-owned entity is filtered by the account bound to
//! the current request, and every write is stamped with it. When no account
//! is bound the access fails closed with `NoActiveTenant` instead of falling
//! back to an unscoped query.

use uuid::Uuid;

use super::{StorageError, StorageResult};

/// Trait for entities that belong to exactly one account.
pub trait TenantOwned {
    /// The owning account's id.
    fn account_id(&self) -> Uuid;
}

/// Read the account id bound to the current request scope.
///
/// # Errors
/// Returns `StorageError::NoActiveTenant` when the request scope is empty.
/// That path is a wiring defect (a scoped repository reached from an
/// unscoped request) and is logged as such.
pub fn active_account_id() -> StorageResult<Uuid> {
    match crate::tenancy::context::active_account_id() {
        Some(id) => Ok(id),
        None => {
            tracing::error!("tenant-owned data access attempted with no scoped account");
            Err(StorageError::NoActiveTenant)
        }
    }
}

/// Retain only the entities owned by the active account.
pub fn filter_scoped<T: TenantOwned>(items: impl IntoIterator<Item = T>) -> StorageResult<Vec<T>> {
    let account_id = active_account_id()?;
    Ok(items
        .into_iter()
        .filter(|item| item.account_id() == account_id)
        .collect())
}

/// Extension trait verifying that a fetched entity is in scope.
pub trait ScopedFetch<T> {
    /// Verify the entity belongs to the active account.
    ///
    /// A cross-account entity is reported with the same `NotFound` as a
    /// missing one, so callers cannot probe for other accounts' ids.
    fn verify_scope(self, what: &str) -> StorageResult<T>;
}

impl<T: TenantOwned> ScopedFetch<T> for StorageResult<T> {
    fn verify_scope(self, what: &str) -> StorageResult<T> {
        let entity = self?;
        if entity.account_id() == active_account_id()? {
            Ok(entity)
        } else {
            Err(StorageError::NotFound(what.to_string()))
        }
    }
}

impl<T: TenantOwned> ScopedFetch<T> for Option<T> {
    fn verify_scope(self, what: &str) -> StorageResult<T> {
        match self {
            Some(entity) => Ok(entity).verify_scope(what),
            None => Err(StorageError::NotFound(what.to_string())),
        }
    }
}
