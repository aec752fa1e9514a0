// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the document store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_JWKS_URL` | IdP JWKS endpoint for JWT verification | Required for production |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | Optional |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `DENIED_METHODS` | Comma-separated HTTP methods rejected at the edge | `PUT` |
//! | `SEED_ACCOUNT_NAME` | Dev-only: seed an account at startup | Unset |
//! | `SEED_USER_EMAIL` | Dev-only: seed a user joined to the seed account | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use axum::http::Method;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the IdP JWKS endpoint.
///
/// When unset the verifier runs in development mode and skips signature
/// verification. MUST be set in production.
pub const JWKS_URL_ENV: &str = "AUTH_JWKS_URL";

/// Environment variable name for the expected JWT issuer.
pub const ISSUER_ENV: &str = "AUTH_ISSUER";

/// Environment variable name for the expected JWT audience.
pub const AUDIENCE_ENV: &str = "AUTH_AUDIENCE";

/// Environment variable name for the edge method denylist.
pub const DENIED_METHODS_ENV: &str = "DENIED_METHODS";

/// Environment variable name for dev seeding of an account.
pub const SEED_ACCOUNT_ENV: &str = "SEED_ACCOUNT_NAME";

/// Environment variable name for dev seeding of a user.
pub const SEED_EMAIL_ENV: &str = "SEED_USER_EMAIL";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Parse the edge method denylist from the environment.
///
/// Unknown method names are ignored with a warning; an unset variable means
/// the default denylist (`PUT`).
pub fn denied_methods_from_env() -> Vec<Method> {
    let Ok(raw) = std::env::var(DENIED_METHODS_ENV) else {
        return vec![Method::PUT];
    };

    let mut methods = Vec::new();
    for name in raw.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match name.to_uppercase().parse::<Method>() {
            Ok(method) => methods.push(method),
            Err(_) => tracing::warn!(method = name, "ignoring unknown method in denylist"),
        }
    }
    methods
}
