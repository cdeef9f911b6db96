//! Namespace syncer

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer, ResourceType,
    Result,
};
use kubegraph_k8s::corev1::Namespace;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{object_profile, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes Namespaces as inventory objects.
pub struct NamespaceBuilder {
    api: Arc<dyn KubeApi>,
}

impl NamespaceBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn namespace_resource(namespace: &Namespace) -> Resource {
    let mut profile = object_profile(&namespace.metadata);
    if let Some(phase) = namespace
        .status
        .as_ref()
        .and_then(|status| status.phase.as_ref())
    {
        profile.insert("status.phase".to_string(), json!(phase));
    }
    Resource::new(
        ResourceId::new(ResourceType::Namespace, &namespace.metadata.name),
        &namespace.metadata.name,
    )
    .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for NamespaceBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Namespace
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();

        // The wildcard anchor goes out with the first page only.
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::Namespace));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching namespaces");
        let page = self
            .api
            .list_namespaces(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(namespace_resource));
        Ok(ListPage {
            resources,
            next_page_token: next_list_token(page.continue_token())?,
        })
    }

    async fn entitlements(
        &self,
        resource: &Resource,
        _page_token: &str,
    ) -> Result<EntitlementsPage> {
        Ok(EntitlementsPage {
            entitlements: standard_verb_entitlements(resource, "namespace"),
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
