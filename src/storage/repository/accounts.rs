// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Account repository.
//!
//! An account is the tenant isolation boundary. Archived or inactive accounts
//! must never be scoped into; the membership resolver enforces that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::{JsonStore, StorageError, StorageResult};

/// Account record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredAccount {
    /// Unique account identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Logo URL
    pub logo: Option<String>,
    /// Disabled accounts reject all new scoping
    pub is_active: bool,
    /// Archived accounts reject all new scoping
    pub archived: bool,
    /// When the account was provisioned
    pub created_on: DateTime<Utc>,
}

impl StoredAccount {
    /// Whether this account may be scoped into at all.
    pub fn accepts_scoping(&self) -> bool {
        self.is_active && !self.archived
    }
}

/// Repository for account records.
pub struct AccountRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> AccountRepository<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Check if an account exists.
    pub fn exists(&self, account_id: Uuid) -> bool {
        self.store
            .exists(self.store.paths().account(&account_id.to_string()))
    }

    /// Get an account by id.
    pub fn get(&self, account_id: Uuid) -> StorageResult<StoredAccount> {
        let path = self.store.paths().account(&account_id.to_string());
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Account {account_id}")));
        }
        self.store.read_json(path)
    }

    /// Look up an account by id, mapping absence to `None`.
    pub fn find(&self, account_id: Uuid) -> StorageResult<Option<StoredAccount>> {
        match self.get(account_id) {
            Ok(account) => Ok(Some(account)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new account.
    pub fn create(&self, account: &StoredAccount) -> StorageResult<()> {
        if self.exists(account.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Account {}",
                account.id
            )));
        }
        self.store
            .write_json(self.store.paths().account(&account.id.to_string()), account)
    }

    /// Overwrite an existing account.
    pub fn update(&self, account: &StoredAccount) -> StorageResult<()> {
        if !self.exists(account.id) {
            return Err(StorageError::NotFound(format!("Account {}", account.id)));
        }
        self.store
            .write_json(self.store.paths().account(&account.id.to_string()), account)
    }

    /// Archive an account. Archived accounts reject all new scoping.
    pub fn archive(&self, account_id: Uuid) -> StorageResult<()> {
        let mut account = self.get(account_id)?;
        account.archived = true;
        self.update(&account)
    }
}
