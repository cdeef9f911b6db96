//! # Kubegraph connector
//!
//! Compiles a cluster's RBAC configuration (Roles, ClusterRoles and the
//! bindings that reference them) into an explicit authorization graph:
//! membership edges (`subject --member--> role`) and permission edges
//! (`role --verb--> target`). Inventory kinds without graph semantics
//! (pods, secrets, ...) are synced as plain objects so type-level grants
//! have wildcard anchors to point at.
//!
//! The graph is a point-in-time snapshot: bindings are bulk-loaded once per
//! connector instance and never refreshed.

pub mod bindings;
pub mod builders;
pub mod connector;
pub mod helpers;
pub mod mapping;
pub mod rules;
pub mod subject;
pub mod verbs;

pub use bindings::{BindingCache, ClusterRoleBindingProvider, RoleBindingProvider};
pub use connector::{ConnectorMetadata, ConnectorOpts, Kubernetes};

/// Page size used for every upstream list call.
pub const RESOURCES_PAGE_SIZE: u32 = 500;
