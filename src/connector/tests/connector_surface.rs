//! Connector construction surface

mod common;

use std::sync::Arc;

use kubegraph_connector::{ConnectorOpts, Kubernetes};
use kubegraph_core::ResourceType;
use kubegraph_k8s::KubeApi;

use common::{namespace, FakeKube};

#[tokio::test]
async fn syncers_cover_every_kind_with_pods_enabled() {
    let fake = Arc::new(FakeKube::new());
    let connector = Arc::new(Kubernetes::new(
        fake as Arc<dyn KubeApi>,
        ConnectorOpts { sync_pods: true },
    ));

    let syncers = connector.resource_syncers();
    let kinds: Vec<ResourceType> = syncers.iter().map(|s| s.resource_type()).collect();
    assert_eq!(kinds.len(), 13);
    assert!(kinds.contains(&ResourceType::Pod));
    assert!(kinds.contains(&ResourceType::Role));
    assert!(kinds.contains(&ResourceType::ClusterRole));
    assert!(kinds.contains(&ResourceType::KubeUser));
    assert!(kinds.contains(&ResourceType::KubeGroup));
}

#[tokio::test]
async fn pod_syncer_is_optional() {
    let fake = Arc::new(FakeKube::new());
    let connector = Arc::new(Kubernetes::new(
        fake as Arc<dyn KubeApi>,
        ConnectorOpts { sync_pods: false },
    ));

    let kinds: Vec<ResourceType> = connector
        .resource_syncers()
        .iter()
        .map(|s| s.resource_type())
        .collect();
    assert_eq!(kinds.len(), 12);
    assert!(!kinds.contains(&ResourceType::Pod));
}

#[tokio::test]
async fn validate_probes_the_namespace_endpoint() {
    let mut fake = FakeKube::new();
    fake.namespaces.push(namespace("default"));
    let connector = Kubernetes::new(Arc::new(fake) as Arc<dyn KubeApi>, ConnectorOpts::default());

    connector.validate().await.unwrap();

    let metadata = connector.metadata();
    assert_eq!(metadata.display_name, "Kubernetes");
}
