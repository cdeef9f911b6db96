//! Kubernetes group enumerator
//!
//! Groups are virtual like users, with one addition: the built-in system
//! groups always exist even when no binding references them.

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

const BUILT_IN_GROUPS: [&str; 3] = [
    "system:masters",
    "system:authenticated",
    "system:unauthenticated",
];

/// Enumerates Kubernetes groups referenced as binding subjects.
pub struct KubeGroupBuilder {
    api: Arc<dyn KubeApi>,
    seen: Mutex<HashSet<String>>,
}

impl KubeGroupBuilder {
    pub fn new(api: Arc<dyn KubeApi>) -> Self {
        Self {
            api,
            seen: Mutex::new(HashSet::new()),
        }
    }
}

fn kube_group_resource(group_name: &str) -> Resource {
    let mut profile = Map::new();
    profile.insert("name".to_string(), json!(group_name));
    Resource::new(
        ResourceId::new(ResourceType::KubeGroup, group_name),
        group_name,
    )
    .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for KubeGroupBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::KubeGroup
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let mut resources: Vec<Resource> = Vec::new();

        // Seed the built-in groups ahead of the scan; the seen-set keeps
        // later binding references from duplicating them.
        {
            let mut seen = self.seen.lock();
            for group in BUILT_IN_GROUPS {
                if seen.insert(group.to_string()) {
                    resources.push(kube_group_resource(group));
                }
            }
        }

        let page = scan_binding_subjects(
            self.api.as_ref(),
            page_token,
            &SubjectKind::Group,
            &self.seen,
        )
        .await?;

        debug!(groups = page.names.len(), "extracted groups from bindings page");
        resources.extend(page.names.iter().map(|name| kube_group_resource(name)));
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
                "Grants the ability to impersonate the {} group",
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
