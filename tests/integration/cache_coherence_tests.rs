//! Cache coherence across role changes and invalidation
//!
//! Demonstrates why invalidation-on-role-change is mandatory: a cached
//! permission set survives a role change until it is explicitly evicted or
//! its TTL lapses.

use crate::common::fixtures::{ActorFactory, GraphScopeStore, TestHarness};
use ufm_backend::auth::{ClientInfo, Credential, Guard, Permission, Role};
use ufm_backend::utils::error::FinanceError;

#[tokio::test]
async fn stale_cache_masks_promotion_until_invalidated() {
    // Actor U1 is promoted viewer → admin while the cache still holds the
    // viewer set with plenty of TTL remaining.
    let viewer = ActorFactory::viewer(None);
    let user_id = viewer.id;
    let harness = TestHarness::new(vec![], GraphScopeStore::new());

    // Warm the cache under the old role.
    let cached = harness
        .cache
        .effective_permissions(user_id, Role::Viewer)
        .await;
    assert!(!cached.contains(&Permission::ManageAudit));

    // Without invalidation the check still sees the demoted set.
    let stale = harness
        .cache
        .effective_permissions(user_id, Role::Admin)
        .await;
    assert!(
        !stale.contains(&Permission::ManageAudit),
        "stale entry must win until invalidated; this is the failure mode \
         invalidation-on-role-change exists to prevent"
    );

    // The role-change call site invalidates, and the next read is correct.
    harness
        .security
        .role_changed(
            user_id,
            None,
            Role::Viewer,
            Role::Admin,
            ClientInfo::default(),
        )
        .await
        .unwrap();

    let fresh = harness
        .cache
        .effective_permissions(user_id, Role::Admin)
        .await;
    assert!(fresh.contains(&Permission::ManageAudit));
}

#[tokio::test]
async fn promoted_actor_passes_guard_after_invalidation() {
    let mut actor = ActorFactory::viewer(None);
    let user_id = actor.id;
    // The credential table reflects the post-promotion role.
    actor.role = Role::Admin;
    let harness = TestHarness::new(vec![("token", actor)], GraphScopeStore::new());

    // Warm the cache while the actor was still a viewer.
    harness
        .cache
        .effective_permissions(user_id, Role::Viewer)
        .await;

    // Credential now resolves the admin role, but the guard still reads the
    // stale viewer set.
    let guard = Guard::new(Permission::ManageAudit);
    let denied = harness
        .engine
        .authorize(&guard, &Credential::new("token"), None)
        .await;
    assert!(matches!(denied, Err(FinanceError::Authorization(_))));

    harness.cache.invalidate(user_id).await;

    harness
        .engine
        .authorize(&guard, &Credential::new("token"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn double_invalidation_is_a_no_op() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user_id = uuid::Uuid::new_v4();

    harness
        .cache
        .effective_permissions(user_id, Role::Viewer)
        .await;

    harness.cache.invalidate(user_id).await;
    harness.cache.invalidate(user_id).await;

    let fresh = harness
        .cache
        .effective_permissions(user_id, Role::FinanceManager)
        .await;
    assert!(fresh.contains(&Permission::CreateBudget));
}

#[tokio::test]
async fn corrupted_backend_entry_recovers_transparently() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user_id = uuid::Uuid::new_v4();
    let key = format!("ufm:user_permissions:{}", user_id);

    use ufm_backend::storage::CacheBackend;
    harness
        .backend
        .set(&key, "\u{0}garbage", Some(600))
        .await
        .unwrap();

    let permissions = harness
        .cache
        .effective_permissions(user_id, Role::DepartmentHead)
        .await;
    assert!(permissions.contains(&Permission::CreateBudget));
    assert!(!permissions.contains(&Permission::DeleteBudget));
}

#[tokio::test]
async fn login_invalidates_previous_session_permissions() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user_id = uuid::Uuid::new_v4();

    harness
        .cache
        .effective_permissions(user_id, Role::DepartmentHead)
        .await;

    harness
        .security
        .login_succeeded(user_id, "mrivera", ClientInfo::default())
        .await;

    let fresh = harness
        .cache
        .effective_permissions(user_id, Role::Viewer)
        .await;
    assert!(!fresh.contains(&Permission::CreateBudget));
}
