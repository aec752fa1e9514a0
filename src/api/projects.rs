// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Project endpoints (tenant-scoped).
//!
//! All data access goes through the scope gate: the repository filters reads
//! by the account bound to the request and stamps it on writes, so handlers
//! never pass an account id around. Updates are PATCH; PUT is rejected at
//! the edge before routing ever sees it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    CreateProjectRequest, PageQuery, Paginated, ProjectResponse, UpdateProjectRequest,
};
use crate::state::AppState;
use crate::storage::{NewProject, ProjectChanges, ProjectRepository};

/// List the active account's projects.
#[utoipa::path(
    get,
    path = "/v1/orgs/{org_id}/projects",
    tag = "Projects",
    security(("bearer" = [])),
    params(("org_id" = Uuid, Path, description = "Account id"), PageQuery),
    responses(
        (status = 200, description = "Projects in the active account", body = Paginated<ProjectResponse>),
        (status = 401, description = "Not a member of this account"),
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<ProjectResponse>>, ApiError> {
    let projects: Vec<ProjectResponse> = ProjectRepository::new(&state.store)
        .list()?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    let base_path = format!("/v1/orgs/{org_id}/projects");
    Ok(Json(Paginated::paginate(projects, &query, &base_path)))
}

/// Create a project in the active account.
#[utoipa::path(
    post,
    path = "/v1/orgs/{org_id}/projects",
    tag = "Projects",
    security(("bearer" = [])),
    params(("org_id" = Uuid, Path, description = "Account id")),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid project name"),
        (status = 401, description = "Not a member of this account"),
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Path(_org_id): Path<Uuid>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    let project = ProjectRepository::new(&state.store).create(NewProject {
        name: name.to_string(),
        description: request.description,
    })?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get a project in the active account.
#[utoipa::path(
    get,
    path = "/v1/orgs/{org_id}/projects/{project_id}",
    tag = "Projects",
    security(("bearer" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Account id"),
        ("project_id" = Uuid, Path, description = "Project id"),
    ),
    responses(
        (status = 200, description = "The project", body = ProjectResponse),
        (status = 401, description = "Not a member of this account"),
        (status = 404, description = "No such project in this account"),
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path((_org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = ProjectRepository::new(&state.store).get(project_id)?;
    Ok(Json(project.into()))
}

/// Update a project in the active account.
#[utoipa::path(
    patch,
    path = "/v1/orgs/{org_id}/projects/{project_id}",
    tag = "Projects",
    security(("bearer" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Account id"),
        ("project_id" = Uuid, Path, description = "Project id"),
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid project name"),
        (status = 401, description = "Not a member of this account"),
        (status = 404, description = "No such project in this account"),
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path((_org_id, project_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("name must not be empty"));
        }
    }

    let project = ProjectRepository::new(&state.store).update(
        project_id,
        ProjectChanges {
            name: request.name.map(|n| n.trim().to_string()),
            description: request.description.map(Some),
        },
    )?;

    Ok(Json(project.into()))
}

/// Delete a project in the active account.
#[utoipa::path(
    delete,
    path = "/v1/orgs/{org_id}/projects/{project_id}",
    tag = "Projects",
    security(("bearer" = [])),
    params(
        ("org_id" = Uuid, Path, description = "Account id"),
        ("project_id" = Uuid, Path, description = "Project id"),
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 401, description = "Not a member of this account"),
        (status = 404, description = "No such project in this account"),
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path((_org_id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    ProjectRepository::new(&state.store).delete(project_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::seeded_state;
    use crate::storage::{AccountRepository, MembershipRepository};
    use crate::tenancy::context::{self, ActiveTenancy};

    async fn in_scope<F: std::future::Future>(
        state: &AppState,
        account_id: Uuid,
        membership_id: Uuid,
        fut: F,
    ) -> F::Output {
        let account = AccountRepository::new(&state.store).get(account_id).unwrap();
        let membership = MembershipRepository::new(&state.store)
            .get(membership_id)
            .unwrap();
        context::scope(async move {
            context::set(ActiveTenancy {
                account,
                membership,
            });
            fut.await
        })
        .await
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let (state, fixture, _temp) = seeded_state();
        let result = in_scope(
            &state,
            fixture.account_id,
            fixture.membership_id,
            create_project(
                State(state.clone()),
                Path(fixture.account_id),
                Json(CreateProjectRequest {
                    name: "   ".into(),
                    description: None,
                }),
            ),
        )
        .await;

        assert_eq!(
            result.unwrap_err().status,
            axum::http::StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let (state, fixture, _temp) = seeded_state();

        let (status, created) = in_scope(
            &state,
            fixture.account_id,
            fixture.membership_id,
            create_project(
                State(state.clone()),
                Path(fixture.account_id),
                Json(CreateProjectRequest {
                    name: "Apollo".into(),
                    description: Some("moonshot".into()),
                }),
            ),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let listed = in_scope(
            &state,
            fixture.account_id,
            fixture.membership_id,
            list_projects(
                State(state.clone()),
                Path(fixture.account_id),
                Query(PageQuery::default()),
            ),
        )
        .await
        .unwrap();

        assert_eq!(listed.0.total, 1);
        assert_eq!(listed.0.results[0].id, created.0.id);
    }
}
