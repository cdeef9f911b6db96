//! Per-kind resource syncers
//!
//! One module per object kind. The RBAC kinds (role, cluster_role) carry the
//! graph semantics; the rest are inventory translations whose wildcard
//! objects anchor type-level permission edges. kube_user and kube_group are
//! virtual kinds synthesized from binding subjects.

mod cluster_role;
mod config_map;
mod daemon_set;
mod deployment;
mod identities;
mod kube_group;
mod kube_user;
mod namespace;
mod node;
mod pod;
mod role;
mod secret;
mod service_account;
mod stateful_set;

pub use cluster_role::ClusterRoleBuilder;
pub use config_map::ConfigMapBuilder;
pub use daemon_set::DaemonSetBuilder;
pub use deployment::DeploymentBuilder;
pub use kube_group::KubeGroupBuilder;
pub use kube_user::KubeUserBuilder;
pub use namespace::NamespaceBuilder;
pub use node::NodeBuilder;
pub use pod::PodBuilder;
pub use role::RoleBuilder;
pub use secret::SecretBuilder;
pub use service_account::ServiceAccountBuilder;
pub use stateful_set::StatefulSetBuilder;

use kubegraph_core::{Entitlement, Resource, ResourceType};

use crate::verbs::RESOURCE_VERBS;

/// The per-object verb entitlements shared by inventory kinds, grantable to
/// roles and cluster roles.
pub(crate) fn standard_verb_entitlements(resource: &Resource, noun: &str) -> Vec<Entitlement> {
    RESOURCE_VERBS
        .iter()
        .map(|verb| {
            Entitlement::permission(
                resource,
                *verb,
                format!("{verb} {}", resource.display_name),
                format!(
                    "Grants {verb} permission on the {} {noun}",
                    resource.display_name
                ),
                &[ResourceType::Role, ResourceType::ClusterRole],
            )
        })
        .collect()
}
