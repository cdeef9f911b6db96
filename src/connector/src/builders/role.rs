//! Role syncer: inventory plus the RBAC graph edges for namespaced roles

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use kubegraph_core::pagination::{decode_list_cursor, next_list_token};
use kubegraph_core::{
    Entitlement, EntitlementsPage, Grant, GrantsPage, ListPage, Resource, ResourceId,
    ResourceSyncer, ResourceType, Result,
};
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::rbac::Role;
use kubegraph_k8s::KubeApi;

use crate::bindings::RoleBindingProvider;
use crate::helpers::{namespace_parent, object_profile};
use crate::rules::permission_grants_from_rules;
use crate::subject::resolve_subject;
use crate::RESOURCES_PAGE_SIZE;

/// Syncs Kubernetes Roles and synthesizes their membership and permission
/// edges.
pub struct RoleBuilder {
    api: Arc<dyn KubeApi>,
    bindings: Arc<dyn RoleBindingProvider>,
}

impl RoleBuilder {
    pub fn new(api: Arc<dyn KubeApi>, bindings: Arc<dyn RoleBindingProvider>) -> Self {
        Self { api, bindings }
    }
}

/// Builds the inventory resource for a Role; object id is `namespace/name`.
fn role_resource(role: &Role) -> Resource {
    let namespace = role.metadata.namespace_or_default();
    let profile = object_profile(&role.metadata);
    Resource::new(
        ResourceId::namespaced(ResourceType::Role, namespace, &role.metadata.name),
        &role.metadata.name,
    )
    .with_parent(namespace_parent(namespace))
    .with_profile(profile)
}

#[async_trait]
impl ResourceSyncer for RoleBuilder {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Role
    }

    async fn list(&self, _parent: Option<&ResourceId>, page_token: &str) -> Result<ListPage> {
        let cursor = decode_list_cursor(page_token)?;
        debug!(continue_token = ?cursor.continue_token, "fetching roles");

        let page = self
            .api
            .list_roles(&ListParams::page(
                RESOURCES_PAGE_SIZE,
                cursor.continue_token.as_deref(),
            ))
            .await?;

        let resources = page.items.iter().map(role_resource).collect();
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
        let entitlements = vec![
            Entitlement::assignment(
                resource,
                "member",
                format!("{} Role Member", resource.display_name),
                format!("Grants membership to the {} role", resource.display_name),
                &[
                    ResourceType::KubeUser,
                    ResourceType::KubeGroup,
                    ResourceType::ServiceAccount,
                ],
            ),
            Entitlement::permission(
                resource,
                "bind",
                format!("Bind {}", resource.display_name),
                format!(
                    "Grants the ability to bind the {} role to subjects without having the permissions it grants",
                    resource.display_name
                ),
                &[ResourceType::Role, ResourceType::ClusterRole],
            ),
            Entitlement::permission(
                resource,
                "escalate",
                format!("Escalate {}", resource.display_name),
                format!(
                    "Grants the ability to escalate the {} role to include permissions that the user doesn't already have",
                    resource.display_name
                ),
                &[ResourceType::Role, ResourceType::ClusterRole],
            ),
        ];
        Ok(EntitlementsPage {
            entitlements,
            next_page_token: String::new(),
        })
    }

    async fn grants(&self, resource: &Resource, _page_token: &str) -> Result<GrantsPage> {
        let (namespace, name) = resource.id.split_namespaced()?;

        debug!(%namespace, %name, "fetching role for grants");
        let role = self.api.get_role(namespace, name).await?;

        let matching = self.bindings.matching_role_bindings(namespace, name).await?;

        let mut grants: Vec<Grant> = Vec::new();

        // Membership edges: one per resolvable (binding, subject) pair.
        for binding in &matching {
            for subject in &binding.subjects {
                match resolve_subject(subject, Some(namespace)) {
                    Ok(principal) => {
                        grants.push(Grant::new(resource.id.clone(), "member", principal));
                    }
                    Err(err) => {
                        warn!(
                            role = %resource.id,
                            subject = %subject.name,
                            %err,
                            "skipping subject for membership grant"
                        );
                    }
                }
            }
        }

        // Permission edges come from the role's own rules, independent of
        // how many bindings exist.
        grants.extend(permission_grants_from_rules(
            resource,
            &role.rules,
            Some(namespace),
        ));

        Ok(GrantsPage {
            grants,
            next_page_token: String::new(),
        })
    }
}
