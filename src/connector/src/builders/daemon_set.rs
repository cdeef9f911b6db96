//! DaemonSet syncer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer, ResourceType,
    Result,
};
use kubegraph_k8s::apps::DaemonSet;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes DaemonSets as inventory objects.
pub struct DaemonSetBuilder {
    api: Arc<dyn KubeApi>,
}

impl DaemonSetBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn daemon_set_resource(daemon_set: &DaemonSet) -> Resource {
    let namespace = daemon_set.metadata.namespace_or_default();
    let mut resource = Resource::new(
        ResourceId::namespaced(
            ResourceType::DaemonSet,
            namespace,
            &daemon_set.metadata.name,
        ),
        &daemon_set.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_description(format!("DaemonSet in namespace {namespace}"));
    if let Some(uid) = &daemon_set.metadata.uid {
        resource = resource.with_external_id(uid);
    }
    resource
}

#[async_trait]
impl ResourceSyncer for DaemonSetBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::DaemonSet
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::DaemonSet));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching daemonsets");
        let page = self
            .api
            .list_daemon_sets(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(daemon_set_resource));
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
            entitlements: standard_verb_entitlements(resource, "daemonset"),
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
