//! Secret syncer

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer, ResourceType,
    Result,
};
use kubegraph_k8s::corev1::Secret;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::KubeApi;

use crate::helpers::{namespace_parent, object_profile, wildcard_resource};
use crate::RESOURCES_PAGE_SIZE;

use super::standard_verb_entitlements;

/// Syncs Kubernetes Secrets as inventory objects.
pub struct SecretBuilder {
    api: Arc<dyn KubeApi>,
}

impl SecretBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self { api }
    }
}

fn secret_resource(secret: &Secret) -> Resource {
    let namespace = secret.metadata.namespace_or_default();
    let mut profile = object_profile(&secret.metadata);
    if let Some(secret_type) = &secret.secret_type {
        profile.insert("type".to_string(), json!(secret_type));
    }

    let mut resource = Resource::new(
        ResourceId::namespaced(ResourceType::Secret, namespace, &secret.metadata.name),
        &secret.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_description(format!(
        "Secret of type {} in namespace {namespace}",
        secret.secret_type.as_deref().unwrap_or("Opaque")
    ))
    .with_profile(profile);
    if let Some(uid) = &secret.metadata.uid {
        resource = resource.with_external_id(uid);
    }
    resource
}

#[async_trait]
impl ResourceSyncer for SecretBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Secret
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        let mut resources = Vec::new();
        if cursor.continue_token.is_none() {
            resources.push(wildcard_resource(ResourceType::Secret));
        }

        debug!(continue_token = ?cursor.continue_token, "fetching secrets");
        let page = self
            .api
            .list_secrets(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        resources.extend(page.items.iter().map(secret_resource));
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
            entitlements: standard_verb_entitlements(resource, "secret"),
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, _resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        Ok(GrantsPage::default())
    }
}
