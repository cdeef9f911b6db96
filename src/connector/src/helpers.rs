//! Shared resource-construction helpers

use serde_json::{json, Map, Value};

use kubegraph_core::{Resource, ResourceId, ResourceType};
use kubegraph_k8s::meta::ObjectMeta;

/// Parent resource id for a namespaced object.
pub fn namespace_parent(namespace: &str) -> ResourceId {
    ResourceId::new(ResourceType::Namespace, namespace)
}

/// Builds the standard profile from object metadata: name, namespace, uid,
/// creation timestamp, labels, and annotations when present.
pub fn object_profile(meta: &ObjectMeta) -> Map<String, Value> {
    let mut profile = Map::new();
    profile.insert("name".to_string(), json!(meta.name));
    if let Some(namespace) = &meta.namespace {
        profile.insert("namespace".to_string(), json!(namespace));
    }
    if let Some(uid) = &meta.uid {
        profile.insert("uid".to_string(), json!(uid));
    }
    if let Some(timestamp) = &meta.creation_timestamp {
        profile.insert("creationTimestamp".to_string(), json!(timestamp.to_rfc3339()));
    }
    if let Some(labels) = &meta.labels {
        profile.insert("labels".to_string(), json!(labels));
    }
    if let Some(annotations) = &meta.annotations {
        profile.insert("annotations".to_string(), json!(annotations));
    }
    profile
}

/// Builds the synthetic resource representing all objects of a type, used as
/// the target anchor for type-level permission grants.
pub fn wildcard_resource(resource_type: ResourceType) -> Resource {
    let display_name = format!("All {}", resource_type.display_name());
    let mut profile = Map::new();
    profile.insert("name".to_string(), json!(display_name));
    profile.insert(
        "uid".to_string(),
        json!(format!("wildcard-{}", resource_type.id())),
    );
    Resource::new(ResourceId::wildcard(resource_type), display_name.clone())
        .with_description(format!(
            "Represents all resources of type {}",
            resource_type.display_name()
        ))
        .with_profile(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_resources_for_every_kind() {
        for resource_type in [
            ResourceType::Namespace,
            ResourceType::ServiceAccount,
            ResourceType::Secret,
            ResourceType::ConfigMap,
            ResourceType::Node,
            ResourceType::Pod,
            ResourceType::Deployment,
            ResourceType::StatefulSet,
            ResourceType::DaemonSet,
        ] {
            let resource = wildcard_resource(resource_type);
            assert_eq!(resource.id.resource, "*");
            assert_eq!(resource.id.resource_type, resource_type);
            assert!(resource.display_name.starts_with("All "));
        }
    }

    #[test]
    fn profile_skips_absent_metadata() {
        let meta = ObjectMeta {
            name: "coredns".to_string(),
            namespace: Some("kube-system".to_string()),
            ..ObjectMeta::default()
        };
        let profile = object_profile(&meta);
        assert_eq!(profile.get("name"), Some(&json!("coredns")));
        assert_eq!(profile.get("namespace"), Some(&json!("kube-system")));
        assert!(!profile.contains_key("uid"));
        assert!(!profile.contains_key("labels"));
    }
}
