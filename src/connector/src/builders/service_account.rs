//! ServiceAccount syncer

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    Entitlement, EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer,
    ResourceType, Result,
};
use kubegraph_k8s::corev1::ServiceAccount;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, object_profile, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

/// Syncs Kubernetes ServiceAccounts as principal inventory.
pub struct ServiceAccountBuilder {
    api: Arc<dyn KubeApi>,
}

impl ServiceAccountBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn service_account_resource(sa: &ServiceAccount) -> Resource {
    let namespace = sa.metadata.namespace_or_default();
    let mut profile = object_profile(&sa.metadata);
    if !sa.secrets.is_empty() {
        let names: Vec<&str> = sa
            .secrets
            .iter()
            .filter_map(|secret| secret.name.as_deref())
            .collect();
        profile.insert("secrets".to_string(), json!(names));
    }
    if !sa.image_pull_secrets.is_empty() {
        let names: Vec<&str> = sa
            .image_pull_secrets
            .iter()
            .filter_map(|secret| secret.name.as_deref())
            .collect();
        profile.insert("imagePullSecrets".to_string(), json!(names));
    }
    Resource::new(
        ResourceId::namespaced(ResourceType::ServiceAccount, namespace, &sa.metadata.name),
        &sa.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for ServiceAccountBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::ServiceAccount
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::ServiceAccount));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching service accounts");
        let page = self
            .api
            .list_service_accounts(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(service_account_resource));
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
        let impersonate = Entitlement::permission(
            resource,
            "impersonate",
            format!("Impersonate {}", resource.display_name),
            format!(
                "Grants the ability to impersonate the {} service account",
                resource.display_name
            ),
            &[ResourceType::Role, ResourceType::ClusterRole],
        );
        Ok(EntitlementsPage {
            entitlements: vec![impersonate],
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
