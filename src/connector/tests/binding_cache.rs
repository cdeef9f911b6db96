//! Binding cache load and query behavior

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use kubegraph_connector::{
    ClusterRoleBindingProvider, ConnectorOpts, Kubernetes, RoleBindingProvider,
};
use kubegraph_k8s::rbac::RoleRefKind;
use kubegraph_k8s::KubeApi;

use common::{
    cluster_role_binding, group_subject, role_binding, user_subject, FakeKube,
};

fn fake_with_bindings() -> FakeKube {
    let mut fake = FakeKube::new();
    fake.role_bindings.push(role_binding(
        "ns-a",
        "rb-1",
        RoleRefKind::Role,
        "reader",
        vec![user_subject("alice")],
    ));
    fake.role_bindings.push(role_binding(
        "ns-b",
        "rb-2",
        RoleRefKind::Role,
        "reader",
        vec![user_subject("bob")],
    ));
    fake.role_bindings.push(role_binding(
        "ns-a",
        "rb-3",
        RoleRefKind::ClusterRole,
        "viewer",
        vec![group_subject("viewers")],
    ));
    fake.cluster_role_bindings.push(cluster_role_binding(
        "crb-1",
        "viewer",
        vec![group_subject("admins")],
    ));
    fake
}

#[tokio::test]
async fn concurrent_first_queries_load_once() {
    let mut fake = fake_with_bindings();
    // Force multi-page loads so the counters measure enumerations, not
    // items.
    fake.page_size = 2;
    let fake = Arc::new(fake);

    let connector = Arc::new(Kubernetes::new(
        fake.clone() as Arc<dyn KubeApi>,
        ConnectorOpts::default(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let connector = Arc::clone(&connector);
        handles.push(tokio::spawn(async move {
            connector.matching_role_bindings("ns-a", "reader").await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    // 3 role bindings at 2 per page = 2 calls; 1 cluster role binding = 1
    // call. Any redundant load would double these.
    assert_eq!(fake.role_binding_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fake.cluster_role_binding_calls.load(Ordering::SeqCst), 1);

    for result in &results {
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].metadata.name, "rb-1");
    }
}

#[tokio::test]
async fn failed_load_publishes_nothing_and_retries() {
    let fake = fake_with_bindings();
    fake.fail_role_binding_pages.store(1, Ordering::SeqCst);
    let fake = Arc::new(fake);

    let connector = Arc::new(Kubernetes::new(
        fake.clone() as Arc<dyn KubeApi>,
        ConnectorOpts::default(),
    ));

    let first = connector.matching_role_bindings("ns-a", "reader").await;
    assert!(first.is_err());
    // The failed attempt must not have touched the second list.
    assert_eq!(fake.cluster_role_binding_calls.load(Ordering::SeqCst), 0);

    // The next call retries the full load from scratch and succeeds.
    let second = connector
        .matching_role_bindings("ns-a", "reader")
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(fake.role_binding_calls.load(Ordering::SeqCst), 2);
    assert_eq!(fake.cluster_role_binding_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn queries_filter_by_namespace_role_ref_kind_and_name() {
    let fake = Arc::new(fake_with_bindings());
    let connector = Arc::new(Kubernetes::new(
        fake.clone() as Arc<dyn KubeApi>,
        ConnectorOpts::default(),
    ));

    // Role query: namespace + Role kind + name all have to match.
    let ns_a = connector
        .matching_role_bindings("ns-a", "reader")
        .await
        .unwrap();
    assert_eq!(ns_a.len(), 1);
    assert_eq!(ns_a[0].metadata.name, "rb-1");

    let missing = connector
        .matching_role_bindings("ns-c", "reader")
        .await
        .unwrap();
    assert!(missing.is_empty());

    // ClusterRole query spans namespaced and cluster bindings.
    let (role_bindings, cluster_bindings) = connector
        .matching_bindings_for_cluster_role("viewer")
        .await
        .unwrap();
    assert_eq!(role_bindings.len(), 1);
    assert_eq!(role_bindings[0].metadata.name, "rb-3");
    assert_eq!(cluster_bindings.len(), 1);
    assert_eq!(cluster_bindings[0].metadata.name, "crb-1");

    let (none_rb, none_crb) = connector
        .matching_bindings_for_cluster_role("unknown")
        .await
        .unwrap();
    assert!(none_rb.is_empty());
    assert!(none_crb.is_empty());
}

#[tokio::test]
async fn load_happens_at_most_once_across_sequential_queries() {
    let fake = Arc::new(fake_with_bindings());
    let connector = Arc::new(Kubernetes::new(
        fake.clone() as Arc<dyn KubeApi>,
        ConnectorOpts::default(),
    ));

    let calls = |counter: &AtomicUsize| counter.load(Ordering::SeqCst);

    connector
        .matching_role_bindings("ns-a", "reader")
        .await
        .unwrap();
    connector
        .matching_bindings_for_cluster_role("viewer")
        .await
        .unwrap();
    connector
        .matching_role_bindings("ns-b", "reader")
        .await
        .unwrap();

    assert_eq!(calls(&fake.role_binding_calls), 1);
    assert_eq!(calls(&fake.cluster_role_binding_calls), 1);
}
