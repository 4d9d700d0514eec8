//! Security event handling
//!
//! The call sites that keep the permission cache coherent and the audit
//! trail complete. Cache invalidation here is a correctness requirement, not
//! an optimization: a stale entry means a demoted user keeps old permissions
//! until TTL expiry.

use crate::audit::{AuditAction, AuditEvent, AuditRecord, AuditTrail};
use crate::auth::cache::PermissionCache;
use crate::auth::rbac::Role;
use crate::auth::types::{ClientInfo, ResourceKind};
use crate::utils::error::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Security-event orchestration over the audit trail and permission cache.
#[derive(Clone)]
pub struct SecurityService {
    cache: Arc<PermissionCache>,
    audit: Arc<AuditTrail>,
}

impl SecurityService {
    pub fn new(cache: Arc<PermissionCache>, audit: Arc<AuditTrail>) -> Self {
        Self { cache, audit }
    }

    /// Successful login: audit the event and invalidate cached permissions.
    ///
    /// The audit write never fails the login.
    pub async fn login_succeeded(&self, actor_id: Uuid, username: &str, client: ClientInfo) {
        self.audit
            .record_auth_event(
                AuditEvent::new(AuditAction::Login, ResourceKind::User)
                    .resource_id(actor_id)
                    .actor(actor_id)
                    .details(json!({"username": username}))
                    .client(client),
            )
            .await;

        self.cache.invalidate(actor_id).await;
        info!(username = username, "User logged in successfully");
    }

    /// Failed login attempt; there is no actor yet.
    pub async fn login_failed(&self, username: &str, client: ClientInfo) {
        self.audit
            .record_auth_event(
                AuditEvent::new(AuditAction::LoginFailed, ResourceKind::User)
                    .details(json!({"username": username, "reason": "invalid_credentials"}))
                    .client(client),
            )
            .await;
    }

    /// Logout: audit only; the cached entry ages out or is replaced at next login.
    pub async fn logout(&self, actor_id: Uuid, username: &str, client: ClientInfo) {
        self.audit
            .record_auth_event(
                AuditEvent::new(AuditAction::Logout, ResourceKind::User)
                    .resource_id(actor_id)
                    .actor(actor_id)
                    .details(json!({"username": username}))
                    .client(client),
            )
            .await;
    }

    /// Role change: audit the diff, then synchronously invalidate.
    ///
    /// The audit write is part of the state change and its failure propagates.
    pub async fn role_changed(
        &self,
        user_id: Uuid,
        acting_user: Option<Uuid>,
        old_role: Role,
        new_role: Role,
        client: ClientInfo,
    ) -> Result<Option<AuditRecord>> {
        let mut event = AuditEvent::new(AuditAction::Update, ResourceKind::User)
            .resource_id(user_id)
            .client(client);
        if let Some(acting) = acting_user {
            event = event.actor(acting);
        }

        let record = self
            .audit
            .record_update(
                event,
                &json!({"role": old_role}),
                &json!({"role": new_role}),
            )
            .await?;

        if record.is_some() {
            self.cache.invalidate(user_id).await;
            info!(
                user_id = %user_id,
                "User role changed from {} to {}", old_role, new_role
            );
        }

        Ok(record)
    }

    /// Two-factor authentication status change: audit the diff and invalidate.
    pub async fn two_factor_changed(
        &self,
        user_id: Uuid,
        enabled: bool,
        client: ClientInfo,
    ) -> Result<Option<AuditRecord>> {
        let record = self
            .audit
            .record_update(
                AuditEvent::new(AuditAction::Update, ResourceKind::User)
                    .resource_id(user_id)
                    .actor(user_id)
                    .client(client),
                &json!({"is_2fa_enabled": !enabled}),
                &json!({"is_2fa_enabled": enabled}),
            )
            .await?;

        self.cache.invalidate(user_id).await;
        Ok(record)
    }

    /// Account deletion: audit the final state, then invalidate.
    pub async fn account_deleted(
        &self,
        user_id: Uuid,
        acting_user: Uuid,
        details: serde_json::Value,
        client: ClientInfo,
    ) -> Result<AuditRecord> {
        let record = self
            .audit
            .record(
                AuditEvent::new(AuditAction::Delete, ResourceKind::User)
                    .resource_id(user_id)
                    .actor(acting_user)
                    .details(details)
                    .client(client),
            )
            .await?;

        self.cache.invalidate(user_id).await;
        Ok(record)
    }

    /// Successful password change.
    pub async fn password_changed(
        &self,
        user_id: Uuid,
        username: &str,
        client: ClientInfo,
    ) -> Result<AuditRecord> {
        self.audit
            .record(
                AuditEvent::new(AuditAction::PasswordChange, ResourceKind::User)
                    .resource_id(user_id)
                    .actor(user_id)
                    .details(json!({"username": username}))
                    .client(client),
            )
            .await
    }

    /// Rejected password change (wrong current password).
    pub async fn password_change_failed(
        &self,
        user_id: Uuid,
        client: ClientInfo,
    ) -> Result<AuditRecord> {
        self.audit
            .record(
                AuditEvent::new(AuditAction::PasswordChangeFailed, ResourceKind::User)
                    .resource_id(user_id)
                    .actor(user_id)
                    .details(json!({"reason": "current_password_incorrect"}))
                    .client(client),
            )
            .await
    }
}
