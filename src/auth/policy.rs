//! Resource-based access control policies
//!
//! Pure predicates deciding whether a role and organizational scope may act
//! on a specific resource instance. An actor with no department never matches
//! a scope-gated resource.

use crate::auth::rbac::Role;
use uuid::Uuid;

/// Resource-based access control policy evaluator.
pub struct ResourcePolicy;

impl ResourcePolicy {
    /// Check if a user can access a department.
    pub fn can_access_department(
        role: Role,
        actor_department: Option<Uuid>,
        target_department: Uuid,
    ) -> bool {
        match role {
            Role::Admin => true,
            Role::FinanceManager => true,
            Role::DepartmentHead => actor_department == Some(target_department),
            Role::Viewer => actor_department == Some(target_department),
        }
    }

    /// Check if a user can manage a budget.
    pub fn can_manage_budget(
        role: Role,
        actor_department: Option<Uuid>,
        budget_department: Uuid,
    ) -> bool {
        match role {
            Role::Admin => true,
            Role::FinanceManager => true,
            Role::DepartmentHead => actor_department == Some(budget_department),
            Role::Viewer => false,
        }
    }

    /// Check if a user can manage a transaction.
    ///
    /// The department is the one owning the transaction's budget; resolving
    /// it is a two-hop read performed by the persistence collaborator.
    pub fn can_manage_transaction(
        role: Role,
        actor_department: Option<Uuid>,
        budget_department: Uuid,
    ) -> bool {
        match role {
            Role::Admin => true,
            Role::FinanceManager => true,
            Role::DepartmentHead => actor_department == Some(budget_department),
            Role::Viewer => false,
        }
    }

    /// Check if a user can modify another user.
    ///
    /// Admins modify anyone; everyone else only their own account.
    pub fn can_modify_user(role: Role, actor_id: Uuid, target_user: Uuid) -> bool {
        if role == Role::Admin {
            return true;
        }
        actor_id == target_user
    }
}
