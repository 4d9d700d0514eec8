//! Audit trail
//!
//! Synchronous recording of security-relevant actions: state changes and
//! authentication events, keyed to actor, resource, and field-level
//! before/after diffs. Records are append-only; nothing in this module
//! updates or deletes one.
//!
//! Permission denials are deliberately not recorded here; they go to the
//! structured log through the guard chain instead.

use crate::auth::types::{ClientInfo, ResourceKind};
use crate::utils::error::{FinanceError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Action verbs recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    LoginFailed,
    Logout,
    PasswordChange,
    PasswordChangeFailed,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Delete => write!(f, "DELETE"),
            AuditAction::Login => write!(f, "LOGIN"),
            AuditAction::LoginFailed => write!(f, "LOGIN_FAILED"),
            AuditAction::Logout => write!(f, "LOGOUT"),
            AuditAction::PasswordChange => write!(f, "PASSWORD_CHANGE"),
            AuditAction::PasswordChangeFailed => write!(f, "PASSWORD_CHANGE_FAILED"),
        }
    }
}

/// Event handed to the trail by a call site.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Action performed
    pub action: AuditAction,
    /// Type of resource affected
    pub resource_type: ResourceKind,
    /// ID of the resource affected, when one exists
    pub resource_id: Option<String>,
    /// Structured detail payload
    pub details: Option<Value>,
    /// Who performed the action; None for pre-authentication events
    pub actor_id: Option<Uuid>,
    /// Client network identity
    pub client: ClientInfo,
}

impl AuditEvent {
    pub fn new(action: AuditAction, resource_type: ResourceKind) -> Self {
        Self {
            action,
            resource_type,
            resource_id: None,
            details: None,
            actor_id: None,
            client: ClientInfo::default(),
        }
    }

    pub fn resource_id<S: ToString>(mut self, id: S) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn client(mut self, client: ClientInfo) -> Self {
        self.client = client;
        self
    }
}

/// Persisted, append-only audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: AuditAction,
    pub resource_type: ResourceKind,
    pub resource_id: Option<String>,
    pub details: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Port for persisting audit records. Append-only by contract.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record.
    async fn append(&self, record: &AuditRecord) -> Result<()>;
}

/// Audit trail facade used by services and authentication call sites.
#[derive(Clone)]
pub struct AuditTrail {
    sink: Arc<dyn AuditSink>,
}

impl AuditTrail {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    fn build_record(&self, event: AuditEvent) -> AuditRecord {
        AuditRecord {
            id: Uuid::new_v4(),
            actor_id: event.actor_id,
            action: event.action,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            details: event.details,
            ip_address: event.client.ip,
            user_agent: event.client.user_agent,
            timestamp: Utc::now(),
        }
    }

    /// Record a state-changing action.
    ///
    /// Runs synchronously with the business operation; a sink failure is
    /// propagated so the caller sees the write fail.
    pub async fn record(&self, event: AuditEvent) -> Result<AuditRecord> {
        debug!(
            action = %event.action,
            resource = %event.resource_type,
            actor = ?event.actor_id,
            "Creating audit record"
        );

        let record = self.build_record(event);
        self.sink.append(&record).await.map_err(|e| {
            error!("Failed to create audit record: {}", e);
            FinanceError::audit(e.to_string())
        })?;
        Ok(record)
    }

    /// Record an authentication event (login, logout, failures).
    ///
    /// An audit-write failure must not fail the login itself: the error is
    /// logged and swallowed.
    pub async fn record_auth_event(&self, event: AuditEvent) -> Option<AuditRecord> {
        let record = self.build_record(event);
        match self.sink.append(&record).await {
            Ok(()) => Some(record),
            Err(e) => {
                error!(
                    action = %record.action,
                    "Failed to create audit record for auth event: {}", e
                );
                None
            }
        }
    }

    /// Record an update with a field-level diff.
    ///
    /// Only fields whose serialized values differ are recorded. An update
    /// that changes nothing produces no record at all.
    pub async fn record_update(
        &self,
        event: AuditEvent,
        old: &Value,
        new: &Value,
    ) -> Result<Option<AuditRecord>> {
        let changed = diff_fields(old, new);
        if changed.is_empty() {
            debug!(
                resource = %event.resource_type,
                "No fields changed, suppressing audit record"
            );
            return Ok(None);
        }

        let event = event.details(json!({ "changed_fields": changed }));
        self.record(event).await.map(Some)
    }
}

/// Field-level diff between two serialized states.
///
/// Walks the fields of `new` and keeps those whose value differs from `old`,
/// shaped `{"field": {"old": .., "new": ..}}`. Fields absent from `new` are
/// untouched fields, not deletions, and are ignored.
pub fn diff_fields(old: &Value, new: &Value) -> Map<String, Value> {
    let mut changed = Map::new();

    let new_fields = match new.as_object() {
        Some(fields) => fields,
        None => return changed,
    };

    for (field, new_value) in new_fields {
        let old_value = old.get(field).cloned().unwrap_or(Value::Null);
        if &old_value != new_value {
            changed.insert(
                field.clone(),
                json!({ "old": old_value, "new": new_value }),
            );
        }
    }

    changed
}

/// In-memory sink for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: std::sync::Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit sink lock poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<()> {
        self.records
            .lock()
            .expect("audit sink lock poisoned")
            .push(record.clone());
        Ok(())
    }
}
