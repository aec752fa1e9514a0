// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! End-to-end request scoping tests over the real router.
//!
//! These drive the whole pipeline: edge method denylist, identity
//! verification (development mode, unsigned JWTs), membership resolution,
//! the per-request tenant context, and the scope gate behind the project
//! endpoints.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use orgscope_server::api::router;
use orgscope_server::state::AppState;
use orgscope_server::storage::repository::{
    AccountRepository, AuthType, MembershipRepository, StoredAccount, StoredMembership,
    StoredUser, UserRepository,
};
use orgscope_server::storage::{JsonStore, StoragePaths};

struct TestEnv {
    app: Router,
    state: AppState,
    _temp: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        let mut store = JsonStore::new(StoragePaths::new(temp.path()));
        store.initialize().expect("initialize storage");

        let state = AppState::new(store);
        Self {
            app: router(state.clone()),
            state,
            _temp: temp,
        }
    }

    fn seed_user(&self, email: &str) -> Uuid {
        let user = StoredUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: email.to_string(),
            profile_pic: None,
            is_verified: true,
            is_active: true,
            auth_type: AuthType::Email,
            created_at: Utc::now(),
        };
        UserRepository::new(&self.state.store)
            .create(&user)
            .unwrap();
        user.id
    }

    fn seed_account(&self, name: &str) -> Uuid {
        let account = StoredAccount {
            id: Uuid::new_v4(),
            name: name.to_string(),
            logo: None,
            is_active: true,
            archived: false,
            created_on: Utc::now(),
        };
        AccountRepository::new(&self.state.store)
            .create(&account)
            .unwrap();
        account.id
    }

    fn join(&self, user_id: Uuid, account_id: Uuid) -> Uuid {
        let membership = StoredMembership {
            id: Uuid::new_v4(),
            account_id,
            user_id,
            archived: false,
            created_at: Utc::now(),
        };
        MembershipRepository::new(&self.state.store)
            .create(&membership)
            .unwrap();
        membership.id
    }

    /// One user joined to one account, ready to go.
    fn seed_member(&self, email: &str, account_name: &str) -> (Uuid, Uuid) {
        let user_id = self.seed_user(email);
        let account_id = self.seed_account(account_name);
        self.join(user_id, account_id);
        (user_id, account_id)
    }
}

/// Unsigned JWT accepted by development-mode verification.
fn dev_jwt(user_id: Uuid) -> String {
    let header = r#"{"alg":"RS256","typ":"JWT"}"#;
    let claims = format!(r#"{{"sub":"{user_id}","iat":1609459200,"exp":9999999999,"iss":"test"}}"#);
    format!(
        "{}.{}.fake_signature",
        URL_SAFE_NO_PAD.encode(header.as_bytes()),
        URL_SAFE_NO_PAD.encode(claims.as_bytes())
    )
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// Scenario A / P1: an active member is scoped into their account.
#[tokio::test]
async fn member_request_is_scoped_to_their_account() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");
    let token = dev_jwt(user_id);

    let (status, body) = send(
        &env.app,
        request(Method::GET, &format!("/v1/orgs/{account_id}"), Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], account_id.to_string());
    assert_eq!(body["name"], "Tenant One");
}

// Scenario B / P2: every scoping failure is the same generic 401.
#[tokio::test]
async fn scoping_failures_are_indistinguishable() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");
    let token = dev_jwt(user_id);

    // No membership: a second account the user never joined.
    let foreign_account = env.seed_account("Tenant Two");

    // Archived membership.
    let archived_m_account = env.seed_account("Tenant Three");
    let membership_id = env.join(user_id, archived_m_account);
    MembershipRepository::new(&env.state.store)
        .archive(membership_id)
        .unwrap();

    // Archived account.
    let archived_account = env.seed_account("Tenant Four");
    env.join(user_id, archived_account);
    AccountRepository::new(&env.state.store)
        .archive(archived_account)
        .unwrap();

    // Nonexistent account id.
    let ghost_account = Uuid::new_v4();

    for target in [
        foreign_account,
        archived_m_account,
        archived_account,
        ghost_account,
    ] {
        let (status, body) = send(
            &env.app,
            request(Method::GET, &format!("/v1/orgs/{target}"), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "account {target}");
        assert_eq!(body, serde_json::json!({"error": "Not Authorized"}));
    }

    // Sanity: the member's own account still works.
    let (status, _) = send(
        &env.app,
        request(Method::GET, &format!("/v1/orgs/{account_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// Scenario C / P3: PUT dies at the edge, before any auth or store work.
#[tokio::test]
async fn put_is_rejected_before_authentication() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");

    // No credential at all: were auth to run first this would be a 401.
    let (status, body) = send(
        &env.app,
        request(
            Method::PUT,
            &format!("/v1/orgs/{account_id}/projects/{}", Uuid::new_v4()),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, serde_json::json!({"error": "Method not allowed"}));

    // A valid credential changes nothing.
    let token = dev_jwt(user_id);
    let (status, _) = send(
        &env.app,
        request(
            Method::PUT,
            &format!("/v1/orgs/{account_id}/projects/{}", Uuid::new_v4()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// P5: on unscoped routes a bad credential is not an error at the edge.
#[tokio::test]
async fn unscoped_routes_tolerate_bad_credentials() {
    let env = TestEnv::new();

    // Garbage token, public route: the interceptor stays out of the way.
    let (status, body) = send(
        &env.app,
        request(Method::GET, "/health", Some("complete-garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Protected unscoped route: the handler's own extractor rejects.
    let (status, body) = send(
        &env.app,
        request(Method::GET, "/v1/users/me", Some("complete-garbage"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "malformed_token");

    let (status, body) = send(&env.app, request(Method::GET, "/v1/users/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_auth_header");
}

#[tokio::test]
async fn me_and_account_listing_work_for_members() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");
    let token = dev_jwt(user_id);

    let (status, body) = send(
        &env.app,
        request(Method::GET, "/v1/users/me", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id.to_string());

    let (status, body) = send(
        &env.app,
        request(Method::GET, "/v1/users/me/accounts", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], account_id.to_string());
}

// Cross-tenant isolation through the project endpoints.
#[tokio::test]
async fn projects_are_invisible_across_accounts() {
    let env = TestEnv::new();
    let (user_a, account_a) = env.seed_member("a@example.com", "Tenant A");
    let (user_b, account_b) = env.seed_member("b@example.com", "Tenant B");
    let token_a = dev_jwt(user_a);
    let token_b = dev_jwt(user_b);

    // A creates a project in their account.
    let (status, created) = send(
        &env.app,
        request(
            Method::POST,
            &format!("/v1/orgs/{account_a}/projects"),
            Some(&token_a),
            Some(serde_json::json!({"name": "Apollo"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = created["id"].as_str().unwrap().to_string();

    // B cannot reach it through their own account: same 404 as a missing id.
    let (status, _) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_b}/projects/{project_id}"),
            Some(&token_b),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // B cannot reach it through A's account either: not a member.
    let (status, body) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_a}/projects/{project_id}"),
            Some(&token_b),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, serde_json::json!({"error": "Not Authorized"}));

    // B's listing stays empty; A still sees the project.
    let (_, listing_b) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_b}/projects"),
            Some(&token_b),
            None,
        ),
    )
    .await;
    assert_eq!(listing_b["total"], 0);

    let (_, listing_a) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_a}/projects"),
            Some(&token_a),
            None,
        ),
    )
    .await;
    assert_eq!(listing_a["total"], 1);
}

#[tokio::test]
async fn project_update_and_delete_round_trip() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");
    let token = dev_jwt(user_id);

    let (_, created) = send(
        &env.app,
        request(
            Method::POST,
            &format!("/v1/orgs/{account_id}/projects"),
            Some(&token),
            Some(serde_json::json!({"name": "Apollo", "description": "moonshot"})),
        ),
    )
    .await;
    let project_id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &env.app,
        request(
            Method::PATCH,
            &format!("/v1/orgs/{account_id}/projects/{project_id}"),
            Some(&token),
            Some(serde_json::json!({"name": "Artemis"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Artemis");
    assert_eq!(updated["description"], "moonshot");

    let (status, _) = send(
        &env.app,
        request(
            Method::DELETE,
            &format!("/v1/orgs/{account_id}/projects/{project_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_id}/projects/{project_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn project_listing_is_paginated() {
    let env = TestEnv::new();
    let (user_id, account_id) = env.seed_member("u1@example.com", "Tenant One");
    let token = dev_jwt(user_id);

    for i in 0..3 {
        let (status, _) = send(
            &env.app,
            request(
                Method::POST,
                &format!("/v1/orgs/{account_id}/projects"),
                Some(&token),
                Some(serde_json::json!({"name": format!("p{i}")})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &env.app,
        request(
            Method::GET,
            &format!("/v1/orgs/{account_id}/projects?page=1&page_size=2"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["links"]["next"],
        format!("/v1/orgs/{account_id}/projects?page=2&page_size=2")
    );
    assert_eq!(body["links"]["previous"], serde_json::Value::Null);
}

// Scenario D / P4: concurrent requests each observe only their own tenant.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_cross_tenants() {
    let env = TestEnv::new();

    let members: Vec<(Uuid, Uuid)> = (0..8)
        .map(|i| env.seed_member(&format!("u{i}@example.com"), &format!("Tenant {i}")))
        .collect();

    let mut handles = Vec::new();
    for round in 0..4 {
        for &(user_id, account_id) in &members {
            let app = env.app.clone();
            let token = dev_jwt(user_id);
            handles.push(tokio::spawn(async move {
                let (status, body) = send(
                    &app,
                    request(
                        Method::GET,
                        &format!("/v1/orgs/{account_id}"),
                        Some(&token),
                        None,
                    ),
                )
                .await;
                assert_eq!(status, StatusCode::OK, "round {round}");
                assert_eq!(
                    body["id"],
                    account_id.to_string(),
                    "request observed a foreign tenant"
                );
            }));
        }
    }

    for handle in handles {
        handle.await.expect("request task panicked");
    }
}
