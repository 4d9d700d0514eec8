//! Authentication and authorization types

use crate::auth::rbac::Role;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque proof of identity carried by a request.
///
/// Token issuance and verification are a black box behind
/// [`CredentialService`]; this crate never inspects the token.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Raw bearer token or equivalent
    pub token: String,
}

impl Credential {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// The authenticated identity making a request.
///
/// Constructed once per request from a verified credential and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Stable user identifier
    pub id: Uuid,
    /// Username, for logging and audit details
    pub username: String,
    /// Assigned role
    pub role: Role,
    /// Organizational scope; None means the actor matches no scope-gated resource
    pub department_id: Option<Uuid>,
}

/// Resource families subject to authorization and audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    User,
    Department,
    Budget,
    Transaction,
    Report,
}

impl ResourceKind {
    /// Human-readable name used in user-facing messages.
    pub fn human(&self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Department => "Department",
            ResourceKind::Budget => "Budget",
            ResourceKind::Transaction => "Transaction",
            ResourceKind::Report => "Report",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::User => write!(f, "USER"),
            ResourceKind::Department => write!(f, "DEPARTMENT"),
            ResourceKind::Budget => write!(f, "BUDGET"),
            ResourceKind::Transaction => write!(f, "TRANSACTION"),
            ResourceKind::Report => write!(f, "REPORT"),
        }
    }
}

/// Organizational scope of a resource instance, derived per request.
///
/// For budgets this is the budget's department; for transactions it is the
/// department of the transaction's budget (resolved by the persistence side
/// through the budget lookup). Never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceScope {
    /// Department the resource belongs to, when the family is department-scoped
    pub department_id: Option<Uuid>,
}

impl ResourceScope {
    pub fn department(department_id: Uuid) -> Self {
        Self {
            department_id: Some(department_id),
        }
    }

    pub fn unscoped() -> Self {
        Self {
            department_id: None,
        }
    }
}

/// Client network identity attached to audit records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client IP address
    pub ip: Option<String>,
    /// Client agent string
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn new<S: Into<String>>(ip: S, user_agent: S) -> Self {
        Self {
            ip: Some(ip.into()),
            user_agent: Some(user_agent.into()),
        }
    }
}

/// Credential verification boundary.
///
/// Implemented outside this crate (JWT service, session store). Failures
/// must be `FinanceError::Authentication`.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Resolve the actor behind a request credential.
    async fn resolve_actor(&self, credential: &Credential) -> Result<Actor>;
}

/// Persistence boundary for resource-scope resolution.
///
/// `Ok(None)` means the resource does not exist. Scope evaluation for
/// transactions has an I/O dependency on the budget lookup: implementations
/// resolve transaction → budget → department internally.
#[async_trait]
pub trait ScopeStore: Send + Sync {
    /// Fetch the organizational scope of a resource instance.
    async fn fetch_scope(&self, kind: ResourceKind, id: Uuid) -> Result<Option<ResourceScope>>;
}
