// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Membership repository.
//!
//! A membership binds one user to one account and is the sole authority for
//! "is this caller allowed into this account". Invariant: at most one
//! non-archived membership per (user, account) pair, enforced on create.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::scoped::{self, TenantOwned};
use super::super::{JsonStore, StorageError, StorageResult};

/// Membership record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredMembership {
    /// Unique membership identifier
    pub id: Uuid,
    /// Account this membership grants access to
    pub account_id: Uuid,
    /// User holding the membership
    pub user_id: Uuid,
    /// Archived memberships grant no access; independent of the account's own
    /// archived flag
    pub archived: bool,
    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl TenantOwned for StoredMembership {
    fn account_id(&self) -> Uuid {
        self.account_id
    }
}

/// Repository for membership records.
pub struct MembershipRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> MembershipRepository<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Check if a membership exists.
    pub fn exists(&self, membership_id: Uuid) -> bool {
        self.store
            .exists(self.store.paths().membership(&membership_id.to_string()))
    }

    /// Get a membership by id.
    pub fn get(&self, membership_id: Uuid) -> StorageResult<StoredMembership> {
        let path = self.store.paths().membership(&membership_id.to_string());
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!(
                "Membership {membership_id}"
            )));
        }
        self.store.read_json(path)
    }

    /// Create a new membership.
    ///
    /// Rejects a second non-archived membership for the same (user, account)
    /// pair.
    pub fn create(&self, membership: &StoredMembership) -> StorageResult<()> {
        if self.exists(membership.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Membership {}",
                membership.id
            )));
        }

        if !membership.archived
            && self
                .find_active(membership.user_id, membership.account_id)?
                .is_some()
        {
            return Err(StorageError::AlreadyExists(format!(
                "Membership for user {} in account {}",
                membership.user_id, membership.account_id
            )));
        }

        self.store.write_json(
            self.store.paths().membership(&membership.id.to_string()),
            membership,
        )
    }

    /// Archive a membership, revoking access without deleting history.
    pub fn archive(&self, membership_id: Uuid) -> StorageResult<()> {
        let mut membership = self.get(membership_id)?;
        membership.archived = true;
        self.store.write_json(
            self.store.paths().membership(&membership_id.to_string()),
            &membership,
        )
    }

    /// Find the unique non-archived membership for a (user, account) pair.
    pub fn find_active(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> StorageResult<Option<StoredMembership>> {
        for id in self
            .store
            .list_files(self.store.paths().memberships_dir(), "json")?
        {
            if let Ok(membership) = self.get_by_raw_id(&id) {
                if membership.user_id == user_id
                    && membership.account_id == account_id
                    && !membership.archived
                {
                    return Ok(Some(membership));
                }
            }
        }
        Ok(None)
    }

    /// List all non-archived memberships held by a user.
    pub fn list_for_user(&self, user_id: Uuid) -> StorageResult<Vec<StoredMembership>> {
        let mut memberships = Vec::new();
        for id in self
            .store
            .list_files(self.store.paths().memberships_dir(), "json")?
        {
            if let Ok(membership) = self.get_by_raw_id(&id) {
                if membership.user_id == user_id && !membership.archived {
                    memberships.push(membership);
                }
            }
        }
        Ok(memberships)
    }

    /// List the active account's non-archived memberships.
    ///
    /// Goes through the scope gate: fails closed when no account is scoped.
    pub fn list_scoped(&self) -> StorageResult<Vec<StoredMembership>> {
        let account_id = scoped::active_account_id()?;
        let mut memberships = Vec::new();
        for id in self
            .store
            .list_files(self.store.paths().memberships_dir(), "json")?
        {
            if let Ok(membership) = self.get_by_raw_id(&id) {
                if membership.account_id == account_id && !membership.archived {
                    memberships.push(membership);
                }
            }
        }
        Ok(memberships)
    }

    fn get_by_raw_id(&self, raw_id: &str) -> StorageResult<StoredMembership> {
        self.store
            .read_json(self.store.paths().membership(raw_id))
    }
}
