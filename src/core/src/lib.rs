//! # Kubegraph Core
//!
//! Shared types, traits, and error handling for the kubegraph connector.
//! This package holds the vocabulary of the compiled authorization graph
//! (resource types, identifiers, entitlements, grants), the resource-syncer
//! contract the host drives, and the opaque pagination-token codec.

pub mod error;
pub mod pagination;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use sync::{EntitlementsPage, GrantsPage, ListPage, ResourceSyncer};
pub use types::{Entitlement, EntitlementPurpose, Grant, Resource, ResourceId, ResourceType};
