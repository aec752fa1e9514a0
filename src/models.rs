// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! # API Data Models
//!
//! Request/response DTOs and the pagination envelope. Stored entities live
//! in `storage::repository`; these types are what goes over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthenticatedIdentity;
use crate::storage::repository::{StoredAccount, StoredMembership, StoredProject, StoredUser};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID
    pub user_id: Uuid,
    /// Email address
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Session ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl From<AuthenticatedIdentity> for UserMeResponse {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            full_name: identity.full_name,
            profile_pic: identity.profile_pic,
            is_verified: identity.is_verified,
            session_id: identity.session_id,
        }
    }
}

/// An account as seen by its members.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl From<StoredAccount> for AccountSummary {
    fn from(account: StoredAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            logo: account.logo,
            created_on: account.created_on,
        }
    }
}

/// One member of the active account.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    /// Membership id
    pub id: Uuid,
    /// The member's user id
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub joined_at: DateTime<Utc>,
}

impl MemberResponse {
    pub fn from_parts(membership: StoredMembership, user: StoredUser) -> Self {
        Self {
            id: membership.id,
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            joined_at: membership.created_at,
        }
    }
}

/// A project in the active account.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredProject> for ProjectResponse {
    fn from(project: StoredProject) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Request body for creating a project.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a project. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ========== Pagination ==========

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Pagination query parameters.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    /// Results per page (capped at 100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Links to the neighboring pages, when they exist.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Pagination envelope for list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub links: PageLinks,
    /// Total count of objects across all pages
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Slice one page out of the full result set.
    pub fn paginate(items: Vec<T>, query: &PageQuery, base_path: &str) -> Self {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
        let total = items.len();

        let results: Vec<T> = items
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        let next = (page * page_size < total)
            .then(|| format!("{base_path}?page={}&page_size={page_size}", page + 1));
        let previous =
            (page > 1).then(|| format!("{base_path}?page={}&page_size={page_size}", page - 1));

        Self {
            links: PageLinks { next, previous },
            total,
            page,
            page_size,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: usize, page_size: usize) -> PageQuery {
        PageQuery { page, page_size }
    }

    #[test]
    fn paginate_slices_and_links() {
        let items: Vec<u32> = (0..25).collect();
        let page = Paginated::paginate(items, &query(2, 10), "/v1/things");

        assert_eq!(page.total, 25);
        assert_eq!(page.results, (10..20).collect::<Vec<u32>>());
        assert_eq!(
            page.links.next.as_deref(),
            Some("/v1/things?page=3&page_size=10")
        );
        assert_eq!(
            page.links.previous.as_deref(),
            Some("/v1/things?page=1&page_size=10")
        );
    }

    #[test]
    fn first_page_has_no_previous() {
        let items: Vec<u32> = (0..5).collect();
        let page = Paginated::paginate(items, &query(1, 10), "/v1/things");

        assert_eq!(page.results.len(), 5);
        assert!(page.links.next.is_none());
        assert!(page.links.previous.is_none());
    }

    #[test]
    fn page_size_is_capped() {
        let items: Vec<u32> = (0..500).collect();
        let page = Paginated::paginate(items, &query(1, 10_000), "/v1/things");

        assert_eq!(page.page_size, 100);
        assert_eq!(page.results.len(), 100);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items: Vec<u32> = (0..5).collect();
        let page = Paginated::paginate(items, &query(4, 10), "/v1/things");

        assert!(page.results.is_empty());
        assert!(page.links.next.is_none());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn zero_page_is_clamped_to_first() {
        let items: Vec<u32> = (0..5).collect();
        let page = Paginated::paginate(items, &query(0, 2), "/v1/things");
        assert_eq!(page.page, 1);
        assert_eq!(page.results, vec![0, 1]);
    }
}
