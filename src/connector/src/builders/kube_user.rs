//! Kubernetes user enumerator
//!
//! Users are virtual: they exist only where RBAC bindings reference them.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map};
use tracing::debug;

use kubegraph_core::{
    Entitlement, EntitlementsPage, GrantsPage, ListPage, Resource, ResourceId, ResourceSyncer,
    ResourceType, Result,
};
use kubegraph_k8s::rbac::SubjectKind;
use kubegraph_k8s::KubeApi;

use super::identities::scan_binding_subjects;

/// Enumerates Kubernetes users referenced as binding subjects.
pub struct KubeUserBuilder {
    api: Arc<dyn KubeApi>,
    seen: Mutex<HashSet<String>>,
}

impl KubeUserBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self {
            api,
            seen: Mutex::new(HashSet::new()),
        }
    }
}

fn kube_user_resource(username: &str) -> Resource {
    let mut profile = Map::new();
    profile.insert("name".to_string(), json!(username));
    profile.insert("login".to_string(), json!(username));
    Resource::new(ResourceId::new(ResourceType::KubeUser, username), username)
        .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for KubeUserBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::KubeUser
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let page = scan_binding_subjects(
            self.api.as_ref(),
            page_token,
            &SubjectKind::User,
            &self.seen,
        )
        .await?;

        debug!(users = page.names.len(), "extracted users from bindings page");
        let resources = page
            .names
            .iter()
            .map(|name| kube_user_resource(name))
            .collect();
        Ok(ListPage {
            resources,
            next_page_token: page.next_page_token,
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
                "Grants the ability to impersonate the {} user",
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
