// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

/// Base directory for all persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all users.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user file.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Account Paths ==========

    /// Directory containing all accounts.
    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join("accounts")
    }

    /// Path to a specific account file.
    pub fn account(&self, account_id: &str) -> PathBuf {
        self.accounts_dir().join(format!("{account_id}.json"))
    }

    // ========== Membership Paths ==========

    /// Directory containing all memberships.
    pub fn memberships_dir(&self) -> PathBuf {
        self.root.join("memberships")
    }

    /// Path to a specific membership file.
    pub fn membership(&self, membership_id: &str) -> PathBuf {
        self.memberships_dir().join(format!("{membership_id}.json"))
    }

    // ========== Project Paths ==========

    /// Directory containing all projects.
    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// Path to a specific project file.
    pub fn project(&self, project_id: &str) -> PathBuf {
        self.projects_dir().join(format!("{project_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("/data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.user("u-123"),
            PathBuf::from("/tmp/test-data/users/u-123.json")
        );
    }

    #[test]
    fn entity_paths_are_correct() {
        let paths = StoragePaths::default();
        assert_eq!(paths.users_dir(), PathBuf::from("/data/users"));
        assert_eq!(paths.accounts_dir(), PathBuf::from("/data/accounts"));
        assert_eq!(
            paths.account("a1"),
            PathBuf::from("/data/accounts/a1.json")
        );
        assert_eq!(
            paths.membership("m1"),
            PathBuf::from("/data/memberships/m1.json")
        );
        assert_eq!(paths.project("p1"), PathBuf::from("/data/projects/p1.json"));
    }
}
