//! ConfigMap syncer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer, ResourceType,
    Result,
};
use kubegraph_k8s::corev1::ConfigMap;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes ConfigMaps as inventory objects.
pub struct ConfigMapBuilder {
    api: Arc<dyn KubeApi>,
}

impl ConfigMapBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn config_map_resource(cm: &ConfigMap) -> Resource {
    let namespace = cm.metadata.namespace_or_default();
    let mut resource = Resource::new(
        ResourceId::namespaced(ResourceType::ConfigMap, namespace, &cm.metadata.name),
        &cm.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_description(format!("ConfigMap in namespace {namespace}"));
    if let Some(uid) = &cm.metadata.uid {
        resource = resource.with_external_id(uid);
    }
    resource
}

#[async_trait]
impl ResourceSyncer for ConfigMapBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::ConfigMap
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::ConfigMap));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching configmaps");
        let page = self
            .api
            .list_config_maps(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(config_map_resource));
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
            entitlements: standard_verb_entitlements(resource, "configmap"),
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
