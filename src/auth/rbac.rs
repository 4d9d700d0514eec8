//! Role-Based Access Control (RBAC) model
//!
//! Roles, permissions, and the role hierarchy are closed sets compiled into
//! the binary. The tables are immutable process-wide state and safe for
//! unsynchronized concurrent reads.

use crate::utils::error::FinanceError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// User roles with hierarchical structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full system access
    Admin,
    /// Finance-wide access across all departments
    FinanceManager,
    /// Access scoped to the head's own department
    DepartmentHead,
    /// Read-only access scoped to the viewer's own department
    Viewer,
}

/// System permissions with resource-action structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // User permissions
    CreateUser,
    ReadUser,
    UpdateUser,
    DeleteUser,

    // Department permissions
    CreateDepartment,
    ReadDepartment,
    UpdateDepartment,
    DeleteDepartment,

    // Budget permissions
    CreateBudget,
    ReadBudget,
    UpdateBudget,
    DeleteBudget,

    // Transaction permissions
    CreateTransaction,
    ReadTransaction,
    UpdateTransaction,
    DeleteTransaction,

    // Report permissions
    CreateReport,
    ReadReport,
    DeleteReport,

    // Audit permissions
    ReadAudit,
    ManageAudit,
}

impl Role {
    /// Every defined role
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::FinanceManager,
        Role::DepartmentHead,
        Role::Viewer,
    ];

    /// Roles this role subsumes.
    ///
    /// The table is pre-expanded: every reachable role is listed directly, so
    /// a single lookup level resolves the full hierarchy.
    pub fn subsumes(self) -> &'static [Role] {
        match self {
            Role::Admin => &[Role::FinanceManager, Role::DepartmentHead, Role::Viewer],
            Role::FinanceManager => &[Role::DepartmentHead, Role::Viewer],
            Role::DepartmentHead => &[Role::Viewer],
            Role::Viewer => &[],
        }
    }

    /// Permissions granted to this role directly, before hierarchy expansion.
    pub fn direct_permissions(self) -> &'static [Permission] {
        match self {
            Role::Admin => &Permission::ALL,
            Role::FinanceManager => &[
                Permission::ReadUser,
                Permission::CreateDepartment,
                Permission::ReadDepartment,
                Permission::UpdateDepartment,
                Permission::DeleteDepartment,
                Permission::CreateBudget,
                Permission::ReadBudget,
                Permission::UpdateBudget,
                Permission::DeleteBudget,
                Permission::CreateTransaction,
                Permission::ReadTransaction,
                Permission::UpdateTransaction,
                Permission::DeleteTransaction,
                Permission::CreateReport,
                Permission::ReadReport,
            ],
            Role::DepartmentHead => &[
                Permission::ReadUser,
                Permission::ReadDepartment,
                Permission::CreateBudget,
                Permission::ReadBudget,
                Permission::UpdateBudget,
                Permission::CreateTransaction,
                Permission::ReadTransaction,
                Permission::UpdateTransaction,
                Permission::ReadReport,
            ],
            Role::Viewer => &[
                Permission::ReadUser,
                Permission::ReadDepartment,
                Permission::ReadBudget,
                Permission::ReadTransaction,
                Permission::ReadReport,
            ],
        }
    }
}

impl Permission {
    /// Every defined permission
    pub const ALL: [Permission; 21] = [
        Permission::CreateUser,
        Permission::ReadUser,
        Permission::UpdateUser,
        Permission::DeleteUser,
        Permission::CreateDepartment,
        Permission::ReadDepartment,
        Permission::UpdateDepartment,
        Permission::DeleteDepartment,
        Permission::CreateBudget,
        Permission::ReadBudget,
        Permission::UpdateBudget,
        Permission::DeleteBudget,
        Permission::CreateTransaction,
        Permission::ReadTransaction,
        Permission::UpdateTransaction,
        Permission::DeleteTransaction,
        Permission::CreateReport,
        Permission::ReadReport,
        Permission::DeleteReport,
        Permission::ReadAudit,
        Permission::ManageAudit,
    ];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::FinanceManager => write!(f, "finance_manager"),
            Role::DepartmentHead => write!(f, "department_head"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "finance_manager" => Ok(Role::FinanceManager),
            "department_head" => Ok(Role::DepartmentHead),
            "viewer" => Ok(Role::Viewer),
            other => Err(FinanceError::config(format!("Unknown role: {}", other))),
        }
    }
}

impl Permission {
    /// Wire name used in cache entries and audit payloads.
    pub fn wire_name(self) -> &'static str {
        match self {
            Permission::CreateUser => "create_user",
            Permission::ReadUser => "read_user",
            Permission::UpdateUser => "update_user",
            Permission::DeleteUser => "delete_user",
            Permission::CreateDepartment => "create_department",
            Permission::ReadDepartment => "read_department",
            Permission::UpdateDepartment => "update_department",
            Permission::DeleteDepartment => "delete_department",
            Permission::CreateBudget => "create_budget",
            Permission::ReadBudget => "read_budget",
            Permission::UpdateBudget => "update_budget",
            Permission::DeleteBudget => "delete_budget",
            Permission::CreateTransaction => "create_transaction",
            Permission::ReadTransaction => "read_transaction",
            Permission::UpdateTransaction => "update_transaction",
            Permission::DeleteTransaction => "delete_transaction",
            Permission::CreateReport => "create_report",
            Permission::ReadReport => "read_report",
            Permission::DeleteReport => "delete_report",
            Permission::ReadAudit => "read_audit",
            Permission::ManageAudit => "manage_audit",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for Permission {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.wire_name() == s)
            .ok_or_else(|| FinanceError::config(format!("Unknown permission: {}", s)))
    }
}

/// Effective permissions for a role, including inherited permissions.
///
/// Direct permissions of the role unioned with the direct permissions of
/// every role it subsumes. Pure and deterministic.
pub fn effective_permissions(role: Role) -> HashSet<Permission> {
    let mut permissions: HashSet<Permission> = role.direct_permissions().iter().copied().collect();
    for inherited in role.subsumes() {
        permissions.extend(inherited.direct_permissions().iter().copied());
    }
    permissions
}

/// Check if a role carries a specific permission.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    effective_permissions(role).contains(&permission)
}
