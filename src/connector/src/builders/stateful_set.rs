//! StatefulSet syncer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer, ResourceType,
    Result,
};
use kubegraph_k8s::apps::StatefulSet;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes StatefulSets as inventory objects.
pub struct StatefulSetBuilder {
    api: Arc<dyn KubeApi>,
}

impl StatefulSetBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn stateful_set_resource(stateful_set: &StatefulSet) -> Resource {
    let namespace = stateful_set.metadata.namespace_or_default();
    let mut resource = Resource::new(
        ResourceId::namespaced(
            ResourceType::StatefulSet,
            namespace,
            &stateful_set.metadata.name,
        ),
        &stateful_set.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_description(format!("StatefulSet in namespace {namespace}"));
    if let Some(uid) = &stateful_set.metadata.uid {
        resource = resource.with_external_id(uid);
    }
    resource
}

#[async_trait]
impl ResourceSyncer for StatefulSetBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::StatefulSet
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::StatefulSet));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching statefulsets");
        let page = self
            .api
            .list_stateful_sets(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(stateful_set_resource));
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
            entitlements: standard_verb_entitlements(resource, "statefulset"),
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
