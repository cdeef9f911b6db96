//! Policy rule (apiGroup, resource) to internal resource type mapping

use kubegraph_core::ResourceType;

/// Maps a rule's (API group, resource kind) pair to an internal type.
///
/// Accepts both singular and plural kind spellings and the version-suffixed
/// group names. Wildcard groups and kinds return `None`: a wildcard could
/// denote any resource kind, including ones with no internal representation,
/// and expanding it would misstate the permission graph. Unmapped pairs are
/// skipped by the caller, not errors.
pub fn map_kube_resource(api_group: &str, resource: &str) -> Option<ResourceType> {
    match api_group {
        // Core API group (usually the empty string)
        "" | "core" => match resource {
            "pods" | "pod" => Some(ResourceType::Pod),
            "namespaces" | "namespace" => Some(ResourceType::Namespace),
            "configmaps" | "configmap" => Some(ResourceType::ConfigMap),
            "secrets" | "secret" => Some(ResourceType::Secret),
            "serviceaccounts" | "serviceaccount" => Some(ResourceType::ServiceAccount),
            "nodes" | "node" => Some(ResourceType::Node),
            // Impersonation targets
            "users" | "user" => Some(ResourceType::KubeUser),
            "groups" | "group" => Some(ResourceType::KubeGroup),
            _ => None,
        },
        "apps" | "apps/v1" => match resource {
            "deployments" | "deployment" => Some(ResourceType::Deployment),
            "statefulsets" | "statefulset" => Some(ResourceType::StatefulSet),
            "daemonsets" | "daemonset" => Some(ResourceType::DaemonSet),
            _ => None,
        },
        "rbac.authorization.k8s.io" | "rbac.authorization.k8s.io/v1" => match resource {
            "roles" | "role" => Some(ResourceType::Role),
            "clusterroles" | "clusterrole" => Some(ResourceType::ClusterRole),
            "rolebindings" | "rolebinding" | "clusterrolebindings" | "clusterrolebinding" => {
                Some(ResourceType::Binding)
            }
            _ => None,
        },
        "user.openshift.io" | "user.openshift.io/v1" => match resource {
            "users" | "user" => Some(ResourceType::KubeUser),
            "groups" | "group" => Some(ResourceType::KubeGroup),
            _ => None,
        },
        _ => None,
    }
}
