//! The resource-syncer contract the host protocol drives
//!
//! Every object kind implements the same three-operation capability; the
//! connector hands the host a collection of boxed syncers rather than
//! hard-coding per-kind dispatch.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Entitlement, Grant, Resource, ResourceId, ResourceType};

/// One page of listed inventory objects.
#[derive(Debug, Default)]
pub struct ListPage {
    pub resources: Vec<Resource>,
    /// Opaque token for the next call; empty when the enumeration is done.
    pub next_page_token: String,
}

/// One page of entitlement definitions for a resource.
#[derive(Debug, Default)]
pub struct EntitlementsPage {
    pub entitlements: Vec<Entitlement>,
    pub next_page_token: String,
}

/// One page of grant edges for a resource.
#[derive(Debug, Default)]
pub struct GrantsPage {
    pub grants: Vec<Grant>,
    pub next_page_token: String,
}

/// Per-kind sync capability: type descriptor, paginated listing, entitlement
/// surface, and grant-edge synthesis.
///
/// Calls are request-driven, one page at a time; cancellation is structural
/// (dropping the returned future aborts the in-flight upstream fetch).
#[async_trait]
pub trait ResourceSyncer: Send + Sync {
    /// The object kind this syncer produces.
    fn resource_type(&self) -> ResourceType;

    /// Fetches one page of inventory objects.
    async fn list(&self, parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage>;

    /// Returns the entitlement definitions for one resource.
    async fn entitlements(
        &self,
        resource: &Resource,
        page_token: &str,
    ) -> Result<EntitlementsPage>;

    /// Returns the grant edges attached to one resource.
    async fn grants(&self, resource: &Resource, page_token: &str) -> Result<GrantsPage>;
}
