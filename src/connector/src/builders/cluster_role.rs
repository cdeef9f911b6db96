//! ClusterRole syncer
//!
//! Membership edges distinguish cluster-wide grants (`all:member`, from
//! ClusterRoleBindings) from namespace-bound grants (`<namespace>:member`,
//! from RoleBindings that reference the ClusterRole). The per-namespace
//! member entitlements are enumerated from a TTL-cached namespace list.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    CoreError, Entitlement, EntitlementsPage, Grant, GrantsPage, ListPage, Resource, ResourceId,
    ResourceSyncer, ResourceType, Result,
};
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::rbac::ClusterRole;
use kubegraph_k8s::KubeApi;

use crate::bindings::ClusterRoleBindingProvider;
use crate::helpers::object_profile;
use crate::rules::permission_grants_from_rules;
use crate::subject::resolve_subject;
use crate::RESOURCES_PAGE_SIZE;

const NAMESPACE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Slug of the cluster-wide membership entitlement.
pub const CLUSTER_SCOPED_MEMBER: &str = "all:member";

#[derive(Default)]
struct NamespaceCache {
    names: Vec<String>,
    refreshed_at: Option<Instant>,
}

/// Syncs Kubernetes ClusterRoles and synthesizes their graph edges.
pub struct ClusterRoleBuilder {
    api: Arc<dyn KubeApi>,
    bindings: Arc<dyn ClusterRoleBindingProvider>,
    namespaces: Mutex<NamespaceCache>,
}

impl ClusterRoleBuilder {
    pub fn new(api: Arc<dyn KubeApi>, bindings: Arc<dyn ClusterRoleBindingProvider>) -> Self {
        Self {
            api,
            bindings,
            namespaces: Mutex::new(NamespaceCache::default()),
        }
    }

    /// Returns the cached namespace names, refreshing with a full cursor
    /// drain once the TTL lapses.
    async fn cached_namespaces(&self) -> Result<Vec<String>> {
        let mut cache = self.namespaces.lock().await;
        if let Some(refreshed_at) = cache.refreshed_at {
            if refreshed_at.elapsed() < NAMESPACE_CACHE_TTL {
                return Ok(cache.names.clone());
            }
        }

        let mut names = Vec::new();
        let mut continue_token: Option<String> = None;
        loop {
            let page = self
                .api
                .list_namespaces(&ListParams::page(
                    RESOURCES_PAGE_SIZE,
                    continue_token.as_deref(),
                ))
                .await?;
            names.extend(page.items.iter().map(|ns| ns.metadata.name.clone()));
            match page.continue_token() {
                Some(token) => continue_token = Some(token.to_string()),
                None => break,
            }
        }

        cache.names = names.clone();
        cache.refreshed_at = Some(Instant::now());
        Ok(names)
    }
}

/// Builds the inventory resource for a ClusterRole; object id is the name.
fn cluster_role_resource(cluster_role: &ClusterRole) -> Resource {
    let mut profile = object_profile(&cluster_role.metadata);
    if let Some(aggregation_rule) = &cluster_role.aggregation_rule {
        profile.insert("aggregationRule".to_string(), json!(aggregation_rule));
    }
    Resource::new(
        ResourceId::new(ResourceType::ClusterRole, &cluster_role.metadata.name),
        &cluster_role.metadata.name,
    )
    .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for ClusterRoleBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::ClusterRole
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        debug!(continue_token = ?cursor.continue_token, "fetching cluster roles");

        let page = self
            .api
            .list_cluster_roles(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        let resources = page.items.iter().map(cluster_role_resource).collect();
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
        let grantable = [
            ResourceType::KubeUser,
            ResourceType::KubeGroup,
            ResourceType::ServiceAccount,
        ];

        let mut entitlements = vec![Entitlement::assignment(
            resource,
            CLUSTER_SCOPED_MEMBER,
            format!("{} Cluster Role Member", resource.display_name),
            format!(
                "Grants membership to the {} cluster role",
                resource.display_name
            ),
            &grantable,
        )];

        // A ClusterRole can also be granted through a RoleBinding, binding it
        // into one namespace; surface one member entitlement per namespace.
        for namespace in self.cached_namespaces().await? {
            entitlements.push(Entitlement::assignment(
                resource,
                format!("{namespace}:member"),
                format!(
                    "\"{}\" Cluster Role Member in \"{namespace}\" namespace",
                    resource.display_name
                ),
                format!(
                    "Grants membership to the \"{}\" cluster role in namespace \"{namespace}\"",
                    resource.display_name
                ),
                &grantable,
            ));
        }

        Ok(EntitlementsPage {
            entitlements,
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        let name = resource.id.resource.as_str();
        if name.is_empty() {
            return Err(CoreError::InvalidResourceId {
                id: resource.id.resource.clone(),
                reason: "cluster role name is empty".to_string(),
            });
        }

        let (role_bindings, cluster_bindings) = self
            .bindings
            .matching_bindings_for_cluster_role(name)
            .await?;

        let mut grants: Vec<Grant> = Vec::new();

        // Cluster-wide membership from ClusterRoleBindings. ServiceAccount
        // subjects must carry their own namespace here; there is none to
        // inherit.
        for binding in &cluster_bindings {
            for subject in &binding.subjects {
                match resolve_subject(subject, None) {
                    Ok(principal) => grants.push(Grant::new(
                        resource.id.clone(),
                        CLUSTER_SCOPED_MEMBER,
                        principal,
                    )),
                    Err(err) => {
                        debug!(
                            cluster_role = %name,
                            subject = %subject.name,
                            %err,
                            "skipping subject for cluster membership grant"
                        );
                    }
                }
            }
        }

        // Namespace-bound membership from RoleBindings.
        for binding in &role_bindings {
            let namespace = binding.metadata.namespace_or_default();
            for subject in &binding.subjects {
                match resolve_subject(subject, Some(namespace)) {
                    Ok(principal) => grants.push(Grant::new(
                        resource.id.clone(),
                        format!("{namespace}:member"),
                        principal,
                    )),
                    Err(err) => {
                        warn!(
                            cluster_role = %name,
                            subject = %subject.name,
                            %err,
                            "skipping subject for namespace membership grant"
                        );
                    }
                }
            }
        }

        // Permission edges from the cluster role's own rules; a ClusterRole
        // has no namespace context, so named targets stay bare.
        debug!(%name, "fetching cluster role for grants");
        let cluster_role = self.api.get_cluster_role(name).await?;
        grants.extend(permission_grants_from_rules(
            resource,
            &cluster_role.rules,
            None,
        ));

        Ok(GrantsPage {
            grants,
            next_page_token: String::new(),
        })
    }
}
