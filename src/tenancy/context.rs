// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Orgscope Developers

//! Per-request tenant context store.
//!
//! The binding of "which account is active now" lives in a tokio task-local
//! cell. The scoping middleware enters the scope once per request and is the
//! only writer; everything downstream (handlers, repositories, the scope
//! gate) only reads. Task-locals give each request future its own cell, so
//! two concurrent requests can never observe each other's binding, and the
//! cell is destroyed with the request future even when the connection is
//! dropped mid-handler.
//!
//! Reading outside any scope (a spawned background task, a unit test without
//! [`scope`]) yields empty, which the scope gate turns into a fail-closed
//! error.

use std::cell::RefCell;
use std::future::Future;

use uuid::Uuid;

use crate::storage::repository::{StoredAccount, StoredMembership};

/// The account and membership bound to the current request.
#[derive(Debug, Clone)]
pub struct ActiveTenancy {
    /// The account the request operates under
    pub account: StoredAccount,
    /// The caller's membership in that account
    pub membership: StoredMembership,
}

tokio::task_local! {
    static ACTIVE_TENANCY: RefCell<Option<ActiveTenancy>>;
}

/// Run a future with its own (initially empty) tenant context cell.
///
/// Entered exactly once per request by the scoping middleware.
pub async fn scope<F: Future>(fut: F) -> F::Output {
    ACTIVE_TENANCY.scope(RefCell::new(None), fut).await
}

/// Bind a tenancy to the current request scope.
///
/// Only the scoping middleware calls this. Outside a scope the call is a
/// wiring defect and is dropped with an error log rather than leaking state
/// into some shared cell.
pub fn set(tenancy: ActiveTenancy) {
    let bound = ACTIVE_TENANCY
        .try_with(|cell| *cell.borrow_mut() = Some(tenancy))
        .is_ok();
    if !bound {
        tracing::error!("tenant context set outside a request scope; dropped");
    }
}

/// Clear the current request's tenant context.
///
/// Idempotent; safe to call when nothing was set or outside any scope.
pub fn clear() {
    let _ = ACTIVE_TENANCY.try_with(|cell| cell.borrow_mut().take());
}

/// The full tenancy bound to the current request, if any.
pub fn current() -> Option<ActiveTenancy> {
    ACTIVE_TENANCY
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

/// The account bound to the current request, if any.
pub fn current_tenant() -> Option<StoredAccount> {
    current().map(|tenancy| tenancy.account)
}

/// The caller's membership in the active account, if any.
pub fn current_membership() -> Option<StoredMembership> {
    current().map(|tenancy| tenancy.membership)
}

/// The active account's id, if any.
pub fn active_account_id() -> Option<Uuid> {
    ACTIVE_TENANCY
        .try_with(|cell| cell.borrow().as_ref().map(|tenancy| tenancy.account.id))
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::{StoredAccount, StoredMembership};
    use chrono::Utc;

    fn tenancy_named(name: &str) -> ActiveTenancy {
        let account_id = Uuid::new_v4();
        ActiveTenancy {
            account: StoredAccount {
                id: account_id,
                name: name.to_string(),
                logo: None,
                is_active: true,
                archived: false,
                created_on: Utc::now(),
            },
            membership: StoredMembership {
                id: Uuid::new_v4(),
                account_id,
                user_id: Uuid::new_v4(),
                archived: false,
                created_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn set_then_get_within_scope() {
        scope(async {
            assert!(current().is_none());

            let tenancy = tenancy_named("Acme");
            let account_id = tenancy.account.id;
            set(tenancy);

            assert_eq!(current_tenant().unwrap().name, "Acme");
            assert_eq!(active_account_id(), Some(account_id));
            assert_eq!(
                current_membership().unwrap().account_id,
                account_id
            );
        })
        .await;
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        scope(async {
            set(tenancy_named("Acme"));
            clear();
            assert!(current().is_none());
            // Second clear is a no-op and must not panic.
            clear();
            assert!(current().is_none());
        })
        .await;
    }

    #[tokio::test]
    async fn clear_without_set_is_safe() {
        scope(async {
            clear();
            assert!(current().is_none());
        })
        .await;
    }

    #[test]
    fn reads_outside_any_scope_are_empty() {
        assert!(current().is_none());
        assert!(current_tenant().is_none());
        assert!(active_account_id().is_none());
        clear();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_scopes_are_isolated() {
        let mut handles = Vec::new();
        for i in 0..8 {
            handles.push(tokio::spawn(scope(async move {
                let tenancy = tenancy_named(&format!("tenant-{i}"));
                let expected = tenancy.account.id;
                set(tenancy);

                // Yield repeatedly so the tasks interleave.
                for _ in 0..16 {
                    tokio::task::yield_now().await;
                    assert_eq!(active_account_id(), Some(expected));
                }

                clear();
                assert!(current().is_none());
            })));
        }

        for handle in handles {
            handle.await.expect("scoped task panicked");
        }
    }

    #[tokio::test]
    async fn scope_exit_destroys_the_binding() {
        scope(async {
            set(tenancy_named("Acme"));
        })
        .await;

        // The cell died with the scope; nothing is observable here.
        assert!(current().is_none());
    }
}
