//! Audit trail integration tests
//!
//! Security events flowing through the service layer into the sink, and the
//! suppression rules around empty diffs and denials.

use crate::common::fixtures::{ActorFactory, GraphScopeStore, TestHarness};
use serde_json::json;
use ufm_backend::audit::AuditAction;
use ufm_backend::auth::{ClientInfo, Credential, Guard, Permission, ResourceKind, Role};
use uuid::Uuid;

#[tokio::test]
async fn login_cycle_produces_ordered_records() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user = Uuid::new_v4();
    let client = ClientInfo::new("198.51.100.4", "Mozilla/5.0");

    harness.security.login_failed("mrivera", client.clone()).await;
    harness
        .security
        .login_succeeded(user, "mrivera", client.clone())
        .await;
    harness.security.logout(user, "mrivera", client).await;

    let records = harness.sink.records();
    let actions: Vec<AuditAction> = records.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::LoginFailed, AuditAction::Login, AuditAction::Logout]
    );

    assert_eq!(records[0].actor_id, None);
    assert_eq!(records[1].actor_id, Some(user));
    assert_eq!(records[1].ip_address.as_deref(), Some("198.51.100.4"));
    assert_eq!(records[2].user_agent.as_deref(), Some("Mozilla/5.0"));
}

#[tokio::test]
async fn role_change_audit_carries_field_diff() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user = Uuid::new_v4();
    let admin = Uuid::new_v4();

    harness
        .security
        .role_changed(
            user,
            Some(admin),
            Role::DepartmentHead,
            Role::FinanceManager,
            ClientInfo::default(),
        )
        .await
        .unwrap();

    let records = harness.sink.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.action, AuditAction::Update);
    assert_eq!(record.resource_type, ResourceKind::User);
    assert_eq!(record.actor_id, Some(admin));
    assert_eq!(record.resource_id.as_deref(), Some(user.to_string().as_str()));
    assert_eq!(
        record.details.as_ref().unwrap()["changed_fields"]["role"],
        json!({"old": "department_head", "new": "finance_manager"})
    );
}

#[tokio::test]
async fn noop_role_change_is_suppressed_entirely() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());

    let record = harness
        .security
        .role_changed(
            Uuid::new_v4(),
            None,
            Role::Admin,
            Role::Admin,
            ClientInfo::default(),
        )
        .await
        .unwrap();

    assert!(record.is_none());
    assert!(harness.sink.records().is_empty());
}

#[tokio::test]
async fn permission_denials_are_not_audited() {
    // Denials go to the structured log, not the audit trail.
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let viewer = ActorFactory::viewer(Some(department));

    let harness = TestHarness::new(vec![("viewer", viewer)], graph);
    let guard = Guard::new(Permission::UpdateBudget).with_resource(ResourceKind::Budget);

    let denied = harness
        .engine
        .authorize(&guard, &Credential::new("viewer"), Some(budget))
        .await;
    assert!(denied.is_err());
    assert!(harness.sink.records().is_empty());
}

#[tokio::test]
async fn account_deletion_preserves_final_state_in_details() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user = Uuid::new_v4();
    let admin = Uuid::new_v4();

    let record = harness
        .security
        .account_deleted(
            user,
            admin,
            json!({
                "username": "jpatel",
                "email": "jpatel@university.edu",
                "role": "viewer",
                "is_active": true
            }),
            ClientInfo::new("203.0.113.9", "finance-admin/1.4"),
        )
        .await
        .unwrap();

    assert_eq!(record.action, AuditAction::Delete);
    let details = record.details.as_ref().unwrap();
    assert_eq!(details["username"], json!("jpatel"));
    assert_eq!(details["role"], json!("viewer"));
}

#[tokio::test]
async fn password_change_failure_records_reason() {
    let harness = TestHarness::new(vec![], GraphScopeStore::new());
    let user = Uuid::new_v4();

    harness
        .security
        .password_change_failed(user, ClientInfo::default())
        .await
        .unwrap();
    harness
        .security
        .password_changed(user, "mrivera", ClientInfo::default())
        .await
        .unwrap();

    let records = harness.sink.records();
    assert_eq!(records[0].action, AuditAction::PasswordChangeFailed);
    assert_eq!(
        records[0].details.as_ref().unwrap()["reason"],
        json!("current_password_incorrect")
    );
    assert_eq!(records[1].action, AuditAction::PasswordChange);
}
