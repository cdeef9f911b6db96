//! Pod syncer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    Entitlement, EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer,
    ResourceType, Result,
};
use kubegraph_k8s::corev1::Pod;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes Pods as inventory objects.
pub struct PodBuilder {
    api: Arc<dyn KubeApi>,
}

impl PodBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn pod_resource(pod: &Pod) -> Resource {
    let namespace = pod.metadata.namespace_or_default();
    let mut resource = Resource::new(
        ResourceId::namespaced(ResourceType::Pod, namespace, &pod.metadata.name),
        &pod.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_description(format!("Pod in namespace {namespace}"));
    if let Some(uid) = &pod.metadata.uid {
        resource = resource.with_external_id(uid);
    }
    resource
}

#[async_trait]
impl ResourceSyncer for PodBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Pod
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::Pod));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching pods");
        let page = self
            .api
            .list_pods(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(pod_resource));
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
        let mut entitlements = standard_verb_entitlements(resource, "pod");

        // Pod subresource permissions.
        entitlements.push(Entitlement::permission(
            resource,
            "exec",
            format!("exec {}", resource.display_name),
            format!(
                "Grants execution permission on the {} pod",
                resource.display_name
            ),
            &[ResourceType::Role, ResourceType::ClusterRole],
        ));
        entitlements.push(Entitlement::permission(
            resource,
            "portforward",
            format!("port-forward {}", resource.display_name),
            format!(
                "Grants port-forward permission on the {} pod",
                resource.display_name
            ),
            &[ResourceType::Role, ResourceType::ClusterRole],
        ));

        Ok(EntitlementsPage {
            entitlements,
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
