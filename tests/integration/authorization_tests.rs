//! Guard-chain integration tests
//!
//! Full request flows over a realistic department/budget/transaction graph,
//! exercising the fixed credential → permission → existence → scope order.

use crate::common::fixtures::{ActorFactory, GraphScopeStore, TestHarness};
use ufm_backend::auth::{Credential, Guard, Permission, ResourceKind};
use ufm_backend::utils::error::FinanceError;
use uuid::Uuid;

const UPDATE_BUDGET: Guard = Guard::new(Permission::UpdateBudget).with_resource(ResourceKind::Budget);
const UPDATE_TRANSACTION: Guard =
    Guard::new(Permission::UpdateTransaction).with_resource(ResourceKind::Transaction);

#[tokio::test]
async fn viewer_lacking_update_budget_fails_before_scope_lookup() {
    // Scenario: a viewer scoped to the budget's own department still cannot
    // update it; the permission gate fires before any scope I/O happens.
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let viewer = ActorFactory::viewer(Some(department));

    let harness = TestHarness::new(vec![("viewer", viewer)], graph);

    let result = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("viewer"), Some(budget))
        .await;

    match result {
        Err(FinanceError::Authorization(message)) => {
            assert_eq!(message, "Insufficient permissions")
        }
        other => panic!("expected permission denial, got {:?}", other.err()),
    }
    assert_eq!(harness.scopes.lookup_count(), 0);
}

#[tokio::test]
async fn finance_manager_updates_any_department_budget() {
    // Scenario: a finance manager with no department restriction reaches a
    // budget in an arbitrary department; both gates pass.
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let manager = ActorFactory::finance_manager();

    let harness = TestHarness::new(vec![("fm", manager)], graph);

    let authorized = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("fm"), Some(budget))
        .await
        .unwrap();

    assert!(authorized.has(Permission::UpdateBudget));
    assert_eq!(harness.scopes.lookup_count(), 1);
}

#[tokio::test]
async fn department_head_is_fenced_into_own_department() {
    let mut graph = GraphScopeStore::new();
    let own = graph.department();
    let foreign = graph.department();
    let own_budget = graph.budget_in(own);
    let foreign_budget = graph.budget_in(foreign);
    let head = ActorFactory::department_head(own);

    let harness = TestHarness::new(vec![("head", head)], graph);

    harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("head"), Some(own_budget))
        .await
        .unwrap();

    let denied = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("head"), Some(foreign_budget))
        .await;
    match denied {
        Err(FinanceError::Authorization(message)) => {
            assert_eq!(message, "Access denied to this resource")
        }
        other => panic!("expected scope denial, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn transaction_scope_resolves_through_budget_department() {
    // The two-hop lookup: transaction → budget → department.
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let transaction = graph.transaction_on(budget);
    let head = ActorFactory::department_head(department);

    let harness = TestHarness::new(vec![("head", head)], graph);

    let authorized = harness
        .engine
        .authorize(
            &UPDATE_TRANSACTION,
            &Credential::new("head"),
            Some(transaction),
        )
        .await
        .unwrap();
    assert!(authorized.has(Permission::UpdateTransaction));
}

#[tokio::test]
async fn null_scope_actor_reaches_nothing_scope_gated() {
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let mut head = ActorFactory::department_head(department);
    head.department_id = None;

    let harness = TestHarness::new(vec![("head", head)], graph);

    let result = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("head"), Some(budget))
        .await;
    assert!(matches!(result, Err(FinanceError::Authorization(_))));
}

#[tokio::test]
async fn missing_resource_reads_as_not_found_even_when_scope_would_deny() {
    // Existence is checked before scope, so an invisible resource is
    // indistinguishable from an absent one.
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    graph.budget_in(department);
    let head = ActorFactory::department_head(Uuid::new_v4());

    let harness = TestHarness::new(vec![("head", head)], graph);

    let result = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("head"), Some(Uuid::new_v4()))
        .await;
    match result {
        Err(FinanceError::NotFound(message)) => assert_eq!(message, "Budget not found"),
        other => panic!("expected not found, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn unauthenticated_request_never_reaches_later_guards() {
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);

    let harness = TestHarness::new(vec![], graph);

    let result = harness
        .engine
        .authorize(&UPDATE_BUDGET, &Credential::new("expired"), Some(budget))
        .await;
    assert!(matches!(result, Err(FinanceError::Authentication(_))));
    assert_eq!(harness.scopes.lookup_count(), 0);
}

#[tokio::test]
async fn admin_passes_every_gate() {
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let budget = graph.budget_in(department);
    let transaction = graph.transaction_on(budget);
    let admin = ActorFactory::admin();
    let admin_id = admin.id;
    graph.user(admin_id);

    let harness = TestHarness::new(vec![("admin", admin)], graph);

    for (guard, id) in [
        (UPDATE_BUDGET, budget),
        (UPDATE_TRANSACTION, transaction),
        (
            Guard::new(Permission::UpdateDepartment).with_resource(ResourceKind::Department),
            department,
        ),
    ] {
        harness
            .engine
            .authorize(&guard, &Credential::new("admin"), Some(id))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn non_admin_reaches_only_own_user_record() {
    let mut graph = GraphScopeStore::new();
    let department = graph.department();
    let head = ActorFactory::department_head(department);
    let head_id = head.id;
    let other_user = Uuid::new_v4();
    graph.user(head_id);
    graph.user(other_user);

    let harness = TestHarness::new(vec![("head", head)], graph);
    let guard = Guard::new(Permission::ReadUser).with_resource(ResourceKind::User);

    harness
        .engine
        .authorize(&guard, &Credential::new("head"), Some(head_id))
        .await
        .unwrap();

    let denied = harness
        .engine
        .authorize(&guard, &Credential::new("head"), Some(other_user))
        .await;
    assert!(matches!(denied, Err(FinanceError::Authorization(_))));
}
