// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! # Storage Module
//!
//! Persistent storage as one JSON document per entity under a data directory
//! (`DATA_DIR`, `/data` by default).
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/{user_id}.json
//!   accounts/{account_id}.json
//!   memberships/{membership_id}.json
//!   projects/{project_id}.json
//! ```
//!
//! Tenant-owned entities (memberships, projects) are only reachable through
//! the scope gate in [`scoped`], which injects the active account into every
//! read and write and fails closed when no account is bound to the request.

pub mod fs;
pub mod paths;
pub mod repository;
pub mod scoped;

pub use fs::{JsonStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    AccountRepository, AuthType, MembershipRepository, NewProject, ProjectChanges,
    ProjectRepository, StoredAccount, StoredMembership, StoredProject, StoredUser, UserRepository,
};
pub use scoped::{ScopedFetch, TenantOwned};
