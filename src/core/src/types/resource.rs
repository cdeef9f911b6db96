//! Resource types, identifiers, and inventory objects
//!
//! Every object kind the connector syncs is a variant of [`ResourceType`];
//! kinds referenced by policy rules map onto the same closed set, so rule
//! processing is exhaustive-matched instead of comparing API strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// The synthetic object key denoting "all objects of this type".
pub const WILDCARD: &str = "*";

/// Closed set of object kinds in the compiled graph.
///
/// `Binding` is an internal placeholder kind used when policy rules reference
/// rolebindings/clusterrolebindings themselves; it is never listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "namespace")]
    Namespace,
    #[serde(rename = "service_account")]
    ServiceAccount,
    #[serde(rename = "role")]
    Role,
    #[serde(rename = "cluster_role")]
    ClusterRole,
    #[serde(rename = "secret")]
    Secret,
    #[serde(rename = "configmap")]
    ConfigMap,
    #[serde(rename = "node")]
    Node,
    #[serde(rename = "pod")]
    Pod,
    #[serde(rename = "deployment")]
    Deployment,
    #[serde(rename = "statefulset")]
    StatefulSet,
    #[serde(rename = "daemonset")]
    DaemonSet,
    #[serde(rename = "kube_user")]
    KubeUser,
    #[serde(rename = "kube_group")]
    KubeGroup,
    #[serde(rename = "binding")]
    Binding,
}

impl ResourceType {
    /// Stable identifier used in object ids and emitted records.
    pub fn id(&self) -> &'static str {
        match self {
            ResourceType::Namespace => "namespace",
            ResourceType::ServiceAccount => "service_account",
            ResourceType::Role => "role",
            ResourceType::ClusterRole => "cluster_role",
            ResourceType::Secret => "secret",
            ResourceType::ConfigMap => "configmap",
            ResourceType::Node => "node",
            ResourceType::Pod => "pod",
            ResourceType::Deployment => "deployment",
            ResourceType::StatefulSet => "statefulset",
            ResourceType::DaemonSet => "daemonset",
            ResourceType::KubeUser => "kube_user",
            ResourceType::KubeGroup => "kube_group",
            ResourceType::Binding => "binding",
        }
    }

    /// Human-readable name used in display strings.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::Namespace => "Namespace",
            ResourceType::ServiceAccount => "Service Account",
            ResourceType::Role => "Role",
            ResourceType::ClusterRole => "Cluster Role",
            ResourceType::Secret => "Secret",
            ResourceType::ConfigMap => "Config Map",
            ResourceType::Node => "Node",
            ResourceType::Pod => "Pod",
            ResourceType::Deployment => "Deployment",
            ResourceType::StatefulSet => "Stateful Set",
            ResourceType::DaemonSet => "Daemon Set",
            ResourceType::KubeUser => "Kubernetes User",
            ResourceType::KubeGroup => "Kubernetes Group",
            ResourceType::Binding => "Binding",
        }
    }

    /// Whether objects of this kind live inside a namespace.
    ///
    /// KubeUser and KubeGroup are virtual kinds, treated as cluster-scoped.
    pub fn is_namespaced(&self) -> bool {
        match self {
            ResourceType::Pod
            | ResourceType::Secret
            | ResourceType::ConfigMap
            | ResourceType::ServiceAccount
            | ResourceType::Deployment
            | ResourceType::StatefulSet
            | ResourceType::DaemonSet
            | ResourceType::Role
            | ResourceType::Binding => true,
            ResourceType::Namespace
            | ResourceType::Node
            | ResourceType::ClusterRole
            | ResourceType::KubeUser
            | ResourceType::KubeGroup => false,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Identifier of one object in the graph.
///
/// The object key follows a fixed grammar: `namespace/name` for namespaced
/// kinds, `name` for cluster-scoped kinds, and `"*"` for the type-level
/// wildcard. Names may contain characters such as `:` (`system:masters`);
/// they are never escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    pub resource_type: ResourceType,
    pub resource: String,
}

impl ResourceId {
    pub fn new(resource_type: ResourceType, resource: impl Into<String>) -> Self {
        Self {
            resource_type,
            resource: resource.into(),
        }
    }

    /// Identifier for a namespaced object. `*`/`*` collapses to the plain
    /// type-level wildcard.
    pub fn namespaced(resource_type: ResourceType, namespace: &str, name: &str) -> Self {
        if namespace == WILDCARD && name == WILDCARD {
            return Self::wildcard(resource_type);
        }
        Self::new(resource_type, format!("{namespace}/{name}"))
    }

    /// The type-level wildcard identifier.
    pub fn wildcard(resource_type: ResourceType) -> Self {
        Self::new(resource_type, WILDCARD)
    }

    pub fn is_wildcard(&self) -> bool {
        self.resource == WILDCARD
    }

    /// Splits a `namespace/name` object key into its parts.
    pub fn split_namespaced(&self) -> Result<(&str, &str)> {
        let parts: Vec<&str> = self.resource.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(CoreError::InvalidResourceId {
                id: self.resource.clone(),
                reason: "expected namespace/name".to_string(),
            });
        }
        Ok((parts[0], parts[1]))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type.id(), self.resource)
    }
}

/// One inventory object emitted by a syncer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Upstream UID, when the API object carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub profile: Map<String, Value>,
}

impl Resource {
    pub fn new(id: ResourceId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            parent_id: None,
            description: None,
            external_id: None,
            profile: Map::new(),
        }
    }

    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_profile(mut self, profile: Map<String, Value>) -> Self {
        self.profile = profile;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_display() {
        let id = ResourceId::new(ResourceType::Pod, "kube-system/coredns");
        assert_eq!(id.to_string(), "pod:kube-system/coredns");
    }

    #[test]
    fn namespaced_wildcard_collapses() {
        let id = ResourceId::namespaced(ResourceType::Secret, "*", "*");
        assert_eq!(id.resource, "*");
        assert!(id.is_wildcard());
    }

    #[test]
    fn split_namespaced_roundtrip() {
        let id = ResourceId::namespaced(ResourceType::Role, "ns-a", "reader");
        assert_eq!(id.split_namespaced().unwrap(), ("ns-a", "reader"));
    }

    #[test]
    fn split_namespaced_rejects_bare_names() {
        let id = ResourceId::new(ResourceType::Role, "reader");
        assert!(matches!(
            id.split_namespaced(),
            Err(CoreError::InvalidResourceId { .. })
        ));
    }

    #[test]
    fn scoping_classification() {
        assert!(ResourceType::Pod.is_namespaced());
        assert!(ResourceType::Role.is_namespaced());
        assert!(!ResourceType::ClusterRole.is_namespaced());
        assert!(!ResourceType::KubeUser.is_namespaced());
        assert!(!ResourceType::Node.is_namespaced());
    }
}
