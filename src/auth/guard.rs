//! Authorization guard value objects
//!
//! A [`Guard`] names the permission a protected operation requires and,
//! optionally, the resource family whose scope must also be checked. Guards
//! are plain values built once (typically as constants next to the handler)
//! and executed by [`AuthEngine`](crate::auth::AuthEngine).

use crate::auth::rbac::Permission;
use crate::auth::types::{Actor, ResourceKind};
use std::collections::HashSet;

/// Declarative requirement for a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    permission: Permission,
    resource: Option<ResourceKind>,
}

impl Guard {
    /// Require a permission with no resource-scope check.
    pub const fn new(permission: Permission) -> Self {
        Self {
            permission,
            resource: None,
        }
    }

    /// Additionally require scope access to a resource of the given family.
    pub const fn with_resource(mut self, resource: ResourceKind) -> Self {
        self.resource = Some(resource);
        self
    }

    /// The permission this guard requires.
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// The resource family this guard scopes to, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        self.resource
    }
}

/// Outcome of a passed guard chain: the actor plus the effective permission
/// set used for the decision.
#[derive(Debug, Clone)]
pub struct AuthorizedActor {
    /// The authenticated actor
    pub actor: Actor,
    /// Effective permissions at decision time
    pub permissions: HashSet<Permission>,
}

impl AuthorizedActor {
    /// Check a further permission against the already-resolved set.
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
