// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Repository layer providing typed access to the document store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the JsonStore for all file operations. Tenant-owned repositories
//! go through the scope gate in `storage::scoped`.

pub mod accounts;
pub mod memberships;
pub mod projects;
pub mod users;

pub use accounts::{AccountRepository, StoredAccount};
pub use memberships::{MembershipRepository, StoredMembership};
pub use projects::{NewProject, ProjectChanges, ProjectRepository, StoredProject};
pub use users::{AuthType, StoredUser, UserRepository};
