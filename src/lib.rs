//! # UFM Backend
//!
//! Access-control, permission-caching, and audit core for a university
//! finance management backend.
//!
//! ## Features
//!
//! - **Hierarchical RBAC**: a closed set of roles and permissions with a
//!   pre-expanded inheritance hierarchy, compiled into the binary
//! - **Resource policies**: department-scoped authorization for departments,
//!   budgets, transactions, and users
//! - **Permission caching**: cache-aside effective permission sets over Redis
//!   with explicit invalidation and graceful degradation
//! - **Guard chain**: per-request credential → permission → existence → scope
//!   checks behind a single entry point
//! - **Audit trail**: append-only records of state changes and auth events
//!   with field-level before/after diffs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ufm_backend::auth::{AuthEngine, Credential, Guard, Permission, PermissionCache, ResourceKind};
//! use ufm_backend::config::AppConfig;
//! use ufm_backend::storage;
//!
//! # async fn run(credentials: Arc<dyn ufm_backend::auth::CredentialService>,
//! #              scopes: Arc<dyn ufm_backend::auth::ScopeStore>,
//! #              budget_id: uuid::Uuid) -> ufm_backend::Result<()> {
//! let config = AppConfig::from_file("config/backend.yaml").await?;
//! let backend = storage::backend_from_config(&config.redis).await;
//! let cache = Arc::new(PermissionCache::new(backend, config.cache.clone()));
//! let engine = AuthEngine::new(credentials, scopes, cache);
//!
//! let guard = Guard::new(Permission::UpdateBudget).with_resource(ResourceKind::Budget);
//! let authorized = engine
//!     .authorize(&guard, &Credential::new("bearer-token"), Some(budget_id))
//!     .await?;
//! println!("authorized as {}", authorized.actor.username);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod audit;
pub mod auth;
pub mod config;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use audit::{AuditAction, AuditEvent, AuditRecord, AuditSink, AuditTrail};
pub use auth::{
    Actor, AuthEngine, AuthorizedActor, ClientInfo, Credential, CredentialService, Guard,
    Permission, PermissionCache, ResourceKind, ResourcePolicy, ResourceScope, Role, ScopeStore,
};
pub use config::AppConfig;
pub use services::SecurityService;
pub use storage::CacheBackend;
pub use utils::error::{FinanceError, Result};
