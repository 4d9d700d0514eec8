//! Authentication and authorization system
//!
//! Per-request authorization runs a fixed guard chain: resolve the actor from
//! its credential, check the required permission against the cached effective
//! set, then, for resource-scoped guards, check existence and organizational
//! scope. Later guards assume earlier ones passed; the order never changes.

pub mod cache;
pub mod guard;
pub mod policy;
pub mod rbac;
pub mod types;

pub use cache::PermissionCache;
pub use guard::{AuthorizedActor, Guard};
pub use policy::ResourcePolicy;
pub use rbac::{Permission, Role, effective_permissions, has_permission};
pub use types::{
    Actor, ClientInfo, Credential, CredentialService, ResourceKind, ResourceScope, ScopeStore,
};

use crate::utils::error::{FinanceError, Result};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Authorization engine executing guard chains for protected operations.
///
/// Collaborators are injected: credential verification and scope lookups stay
/// outside this crate, and the permission cache owns its backend.
#[derive(Clone)]
pub struct AuthEngine {
    credentials: Arc<dyn CredentialService>,
    scopes: Arc<dyn ScopeStore>,
    cache: Arc<PermissionCache>,
}

impl AuthEngine {
    /// Create a new authorization engine.
    pub fn new(
        credentials: Arc<dyn CredentialService>,
        scopes: Arc<dyn ScopeStore>,
        cache: Arc<PermissionCache>,
    ) -> Self {
        Self {
            credentials,
            scopes,
            cache,
        }
    }

    /// The permission cache, for invalidation call sites.
    pub fn cache(&self) -> &PermissionCache {
        &self.cache
    }

    /// Execute a guard chain for a request.
    ///
    /// `resource_id` is required when the guard names a resource family. A
    /// denial is returned at the first failing step:
    /// authentication → permission → existence → scope.
    pub async fn authorize(
        &self,
        guard: &Guard,
        credential: &Credential,
        resource_id: Option<Uuid>,
    ) -> Result<AuthorizedActor> {
        let actor = match self.credentials.resolve_actor(credential).await {
            Ok(actor) => actor,
            Err(e) => {
                warn!("Authentication failed: {}", e);
                return Err(match e {
                    FinanceError::Authentication(_) => e,
                    other => FinanceError::authentication(other.to_string()),
                });
            }
        };

        let permissions = self
            .cache
            .effective_permissions(actor.id, actor.role)
            .await;
        if !permissions.contains(&guard.permission()) {
            warn!(
                actor = %actor.username,
                role = %actor.role,
                permission = %guard.permission(),
                "Permission denied"
            );
            return Err(FinanceError::authorization("Insufficient permissions"));
        }

        if let Some(kind) = guard.resource() {
            let id = resource_id.ok_or_else(|| {
                FinanceError::config(format!(
                    "guard for {} requires a resource id",
                    guard.permission()
                ))
            })?;
            self.check_resource_access(&actor, kind, id).await?;
        }

        debug!(
            actor = %actor.username,
            permission = %guard.permission(),
            "Authorization granted"
        );
        Ok(AuthorizedActor { actor, permissions })
    }

    /// Resource existence and scope checks, in that order.
    ///
    /// Existence runs first so a resource the actor may not see reads as
    /// not-found rather than forbidden; a failed lookup is also reported as
    /// not-found (fail-closed).
    async fn check_resource_access(
        &self,
        actor: &Actor,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<()> {
        let scope = match self.scopes.fetch_scope(kind, id).await {
            Ok(Some(scope)) => scope,
            Ok(None) => {
                debug!(resource = %kind, id = %id, "Resource not found");
                return Err(FinanceError::not_found(format!("{} not found", kind.human())));
            }
            Err(e) => {
                warn!(
                    resource = %kind,
                    id = %id,
                    "Scope lookup failed, treating as not found: {}", e
                );
                return Err(FinanceError::not_found(format!("{} not found", kind.human())));
            }
        };

        let allowed = match kind {
            ResourceKind::Department => {
                ResourcePolicy::can_access_department(actor.role, actor.department_id, id)
            }
            ResourceKind::Budget => scope
                .department_id
                .map(|d| ResourcePolicy::can_manage_budget(actor.role, actor.department_id, d))
                .unwrap_or(false),
            ResourceKind::Transaction => scope
                .department_id
                .map(|d| ResourcePolicy::can_manage_transaction(actor.role, actor.department_id, d))
                .unwrap_or(false),
            ResourceKind::User => ResourcePolicy::can_modify_user(actor.role, actor.id, id),
            ResourceKind::Report => {
                return Err(FinanceError::config(
                    "REPORT resources carry no scope policy",
                ));
            }
        };

        if !allowed {
            warn!(
                actor = %actor.username,
                role = %actor.role,
                resource = %kind,
                id = %id,
                "Resource access denied"
            );
            return Err(FinanceError::authorization("Access denied to this resource"));
        }

        Ok(())
    }
}
