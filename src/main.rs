// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

use std::{env, net::SocketAddr};

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use orgscope_server::api::router;
use orgscope_server::auth::JwksManager;
use orgscope_server::config;
use orgscope_server::state::{AppState, AuthConfig, ScopeConfig};
use orgscope_server::storage::repository::{
    AccountRepository, AuthType, MembershipRepository, StoredAccount, StoredMembership,
    StoredUser, UserRepository,
};
use orgscope_server::storage::{paths::DATA_ROOT, JsonStore, StoragePaths};

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir = env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| DATA_ROOT.to_string());
    let mut store = JsonStore::new(StoragePaths::new(&data_dir));
    store.initialize().expect("Failed to initialize storage");

    let auth = auth_config_from_env();
    if auth.jwks.is_none() {
        tracing::warn!(
            "{} not set; JWT signatures are NOT verified (development mode)",
            config::JWKS_URL_ENV
        );
    }

    seed_from_env(&store);

    let state = AppState::new(store)
        .with_auth(auth)
        .with_scoping(ScopeConfig {
            denied_methods: config::denied_methods_from_env(),
        });
    let app = router(state);

    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "Orgscope server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

/// Initialize tracing from `RUST_LOG` and `LOG_FORMAT`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    let json = env::var(config::LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the IdP verification config from the environment.
fn auth_config_from_env() -> AuthConfig {
    AuthConfig {
        jwks: env::var(config::JWKS_URL_ENV)
            .ok()
            .map(|url| std::sync::Arc::new(JwksManager::new(url))),
        issuer: env::var(config::ISSUER_ENV).ok(),
        audience: env::var(config::AUDIENCE_ENV).ok(),
    }
}

/// Seed a development account/user into an empty store.
///
/// Controlled by `SEED_ACCOUNT_NAME` and `SEED_USER_EMAIL`; a store that
/// already holds accounts is left untouched so restarts do not duplicate
/// records.
fn seed_from_env(store: &JsonStore) {
    let Ok(account_name) = env::var(config::SEED_ACCOUNT_ENV) else {
        return;
    };

    let already_populated = store
        .list_files(store.paths().accounts_dir(), "json")
        .map(|ids| !ids.is_empty())
        .unwrap_or(true);
    if already_populated {
        return;
    }

    let account = StoredAccount {
        id: Uuid::new_v4(),
        name: account_name,
        logo: None,
        is_active: true,
        archived: false,
        created_on: Utc::now(),
    };
    if let Err(err) = AccountRepository::new(store).create(&account) {
        tracing::warn!(%err, "failed to seed account");
        return;
    }
    tracing::info!(account_id = %account.id, "seeded development account");

    let Ok(email) = env::var(config::SEED_EMAIL_ENV) else {
        return;
    };

    let user = StoredUser {
        id: Uuid::new_v4(),
        email: email.to_lowercase(),
        full_name: "Seed User".to_string(),
        profile_pic: None,
        is_verified: true,
        is_active: true,
        auth_type: AuthType::Email,
        created_at: Utc::now(),
    };
    let membership = StoredMembership {
        id: Uuid::new_v4(),
        account_id: account.id,
        user_id: user.id,
        archived: false,
        created_at: Utc::now(),
    };

    let seeded = UserRepository::new(store)
        .create(&user)
        .and_then(|_| MembershipRepository::new(store).create(&membership));
    match seeded {
        Ok(()) => {
            tracing::info!(user_id = %user.id, account_id = %account.id, "seeded development user")
        }
        Err(err) => tracing::warn!(%err, "failed to seed user"),
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
