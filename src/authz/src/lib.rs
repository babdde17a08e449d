//! # TerraMatch Authorization Engine
//!
//! Decides whether an actor may perform an action on a resource of the
//! TerraMatch restoration platform.
//!
//! ## Features
//!
//! - **Entity policies** for projects, sites, nurseries, reports, media and the rest
//! - **Explicit rules** as tagged variants evaluated by a small interpreter
//! - **Transitive ownership** through report → site → project → organisation chains
//! - **Fail-closed**: unknown subject types, missing actors and unreadable context all deny
//! - **Async-first design** using Tokio runtime, with PostgreSQL and in-memory context sources
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use terramatch_authz::{
//!     ActorContext, AuthorizationService, AuthzConfig, InMemoryDirectory, PolicyRegistry, Subject,
//! };
//! use terramatch_authz::entities::Project;
//!
//! #[tokio::main]
//! async fn main() {
//!     let directory = Arc::new(InMemoryDirectory::new());
//!     directory.set_owned_organisation(7, Some(42)).await;
//!     directory.grant(7, "manage-own").await;
//!
//!     let service = AuthorizationService::with_directory(
//!         AuthzConfig::default(),
//!         directory,
//!         PolicyRegistry::standard(),
//!     );
//!
//!     let project = Project { id: 5, organisation_id: Some(42), framework_key: None };
//!     let actor = ActorContext::authenticated(7);
//!
//!     assert!(service.authorize(&actor, "read", Subject::from(&project)).await.is_ok());
//! }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod entities;
pub mod error;
pub mod policies;
pub mod registry;
pub mod rule;
pub mod subject;
pub mod types;

// Re-export commonly used types
pub use config::{AuthzConfig, DatabaseConfig};
pub use context::{InMemoryDirectory, MembershipResolver, MembershipStatus, PermissionSource};
pub use engine::{AuthorizationService, EngineMetrics};
pub use error::{AccessDenied, AuthzError, Result};
pub use registry::PolicyRegistry;
pub use rule::{Condition, Rule};
pub use subject::{Attr, AttrValue, Record, Subject, SubjectType};
pub use types::{ActorContext, MembershipSnapshot, OrgId, ProjectId, ProjectRoles, TokenSet, UserId};

#[cfg(feature = "postgres")]
pub use context::PostgresDirectory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
