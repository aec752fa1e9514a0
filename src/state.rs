// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Shared application state.

use std::sync::Arc;

use axum::http::Method;

use crate::auth::JwksManager;
use crate::storage::JsonStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    pub auth: AuthConfig,
    pub scoping: ScopeConfig,
}

/// Identity-provider verification settings.
///
/// With `jwks` unset the verifier runs in development mode (structure and
/// expiry checks only, no signature verification).
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub jwks: Option<Arc<JwksManager>>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// Request-scoping settings.
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    /// HTTP methods rejected at the edge, before any auth work.
    pub denied_methods: Vec<Method>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            denied_methods: vec![Method::PUT],
        }
    }
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store: Arc::new(store),
            auth: AuthConfig::default(),
            scoping: ScopeConfig::default(),
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_scoping(mut self, scoping: ScopeConfig) -> Self {
        self.scoping = scoping;
        self
    }
}
