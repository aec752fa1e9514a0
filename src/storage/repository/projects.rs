// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Project repository.
//!
//! Projects are the account-owned sample resource. Every operation here goes
//! through the scope gate: reads are filtered by the active account, writes
//! are stamped with it, and cross-account ids behave exactly like missing
//! ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::super::scoped::{self, ScopedFetch, TenantOwned};
use super::super::{JsonStore, StorageError, StorageResult};

/// Project record stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StoredProject {
    /// Unique project identifier
    pub id: Uuid,
    /// Owning account (stamped from the request scope on create)
    pub account_id: Uuid,
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the project was created
    pub created_at: DateTime<Utc>,
    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for StoredProject {
    fn account_id(&self) -> Uuid {
        self.account_id
    }
}

/// Fields for creating a project; the owning account comes from the scope.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

/// Fields for updating a project; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Repository for project records. All operations are account-scoped.
pub struct ProjectRepository<'a> {
    store: &'a JsonStore,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Get a project in the active account.
    ///
    /// A project belonging to another account reports the same `NotFound` as
    /// a missing id.
    pub fn get(&self, project_id: Uuid) -> StorageResult<StoredProject> {
        let path = self.store.paths().project(&project_id.to_string());
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Project {project_id}")));
        }
        let project: StorageResult<StoredProject> = self.store.read_json(path);
        project.verify_scope(&format!("Project {project_id}"))
    }

    /// List the active account's projects.
    pub fn list(&self) -> StorageResult<Vec<StoredProject>> {
        let mut projects = Vec::new();
        for id in self
            .store
            .list_files(self.store.paths().projects_dir(), "json")?
        {
            if let Ok(project) = self
                .store
                .read_json::<StoredProject>(self.store.paths().project(&id))
            {
                projects.push(project);
            }
        }
        let mut projects = scoped::filter_scoped(projects)?;
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    /// Create a project in the active account.
    ///
    /// The owning account id is stamped from the request scope, never taken
    /// from the caller.
    pub fn create(&self, new: NewProject) -> StorageResult<StoredProject> {
        let account_id = scoped::active_account_id()?;
        let now = Utc::now();
        let project = StoredProject {
            id: Uuid::new_v4(),
            account_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        self.store.write_json(
            self.store.paths().project(&project.id.to_string()),
            &project,
        )?;
        Ok(project)
    }

    /// Apply changes to a project in the active account.
    pub fn update(&self, project_id: Uuid, changes: ProjectChanges) -> StorageResult<StoredProject> {
        let mut project = self.get(project_id)?;
        if let Some(name) = changes.name {
            project.name = name;
        }
        if let Some(description) = changes.description {
            project.description = description;
        }
        project.updated_at = Utc::now();
        self.store.write_json(
            self.store.paths().project(&project_id.to_string()),
            &project,
        )?;
        Ok(project)
    }

    /// Delete a project in the active account.
    pub fn delete(&self, project_id: Uuid) -> StorageResult<()> {
        // Scope check first: a cross-account id must 404, not delete.
        self.get(project_id)?;
        self.store
            .delete(self.store.paths().project(&project_id.to_string()))
    }
}
