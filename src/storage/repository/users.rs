// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! User repository.
//!
//! A user is an authenticated caller identity. Users are never deleted, only
//! deactivated, so every historical membership keeps a valid owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::{JsonStore, StorageError, StorageResult};

/// How the user first authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthType {
    Email,
    Google,
}

/// User record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier
    pub id: Uuid,
    /// Email address (unique, lowercased)
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Profile picture URL
    pub profile_pic: Option<String>,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Deactivated users fail identity verification
    pub is_active: bool,
    /// Signup channel
    pub auth_type: AuthType,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

/// Repository for user records.
pub struct UserRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: Uuid) -> bool {
        self.store
            .exists(self.store.paths().user(&user_id.to_string()))
    }

    /// Get a user by id.
    pub fn get(&self, user_id: Uuid) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(&user_id.to_string());
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Look up a user by id, mapping absence to `None`.
    pub fn find(&self, user_id: Uuid) -> StorageResult<Option<StoredUser>> {
        match self.get(user_id) {
            Ok(user) => Ok(Some(user)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a new user.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        self.store
            .write_json(self.store.paths().user(&user.id.to_string()), user)
    }

    /// Overwrite an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.store
            .write_json(self.store.paths().user(&user.id.to_string()), user)
    }

    /// Deactivate a user. Users are never deleted.
    pub fn deactivate(&self, user_id: Uuid) -> StorageResult<()> {
        let mut user = self.get(user_id)?;
        user.is_active = false;
        self.update(&user)
    }
}
