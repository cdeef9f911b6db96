//! Role grants synthesis
//!
//! Covers the membership/permission split: membership edges come from
//! bindings, permission edges from the role's own rules, and the two are
//! independent.

mod common;

use std::sync::Arc;

use kubegraph_connector::builders::RoleBuilder;
use kubegraph_core::{CoreError, Resource, ResourceId, ResourceSyncer, ResourceType};
use kubegraph_k8s::rbac::{RoleRefKind, Subject, SubjectKind};

use common::{
    group_subject, role, role_binding, rule, service_account_subject, user_subject, FakeKube,
    MockRoleBindingProvider,
};

fn role_resource(namespace: &str, name: &str) -> Resource {
    Resource::new(
        ResourceId::namespaced(ResourceType::Role, namespace, name),
        name,
    )
}

fn builder(fake: FakeKube, provider: MockRoleBindingProvider) -> RoleBuilder {
    RoleBuilder::new(Arc::new(fake), Arc::new(provider))
}

#[tokio::test]
async fn no_bindings_means_no_membership_edges() {
    let mut fake = FakeKube::new();
    fake.roles
        .push(role("test-ns", "pod-reader", vec![rule(&["get"], &[""], &["pods"])]));

    let builder = builder(fake, MockRoleBindingProvider::new());
    let resource = role_resource("test-ns", "pod-reader");
    let page = builder.grants(&resource, "").await.unwrap();

    // Permission edges derive from the rules alone and are unaffected.
    assert!(page.grants.iter().all(|g| g.entitlement != "member"));
    assert_eq!(page.grants.len(), 1);
    assert_eq!(page.grants[0].entitlement, "get");
    assert_eq!(page.grants[0].target.resource_type, ResourceType::Pod);
    assert!(page.grants[0].target.is_wildcard());
}

#[tokio::test]
async fn verb_by_resource_cross_product() {
    let mut fake = FakeKube::new();
    fake.roles.push(role(
        "test-ns",
        "resource-reader",
        vec![rule(&["get", "list"], &[""], &["pods", "configmaps", "secrets"])],
    ));

    let mut provider = MockRoleBindingProvider::new();
    provider.add_binding(
        "test-ns",
        "resource-reader",
        role_binding(
            "test-ns",
            "reader-binding",
            RoleRefKind::Role,
            "resource-reader",
            vec![user_subject("reader")],
        ),
    );

    let builder = builder(fake, provider);
    let resource = role_resource("test-ns", "resource-reader");
    let page = builder.grants(&resource, "").await.unwrap();

    let memberships: Vec<_> = page
        .grants
        .iter()
        .filter(|g| g.entitlement == "member")
        .collect();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].principal.resource_type, ResourceType::KubeUser);
    assert_eq!(memberships[0].principal.resource, "reader");
    assert_eq!(memberships[0].target, resource.id);

    // 2 verbs x 3 resource types, one edge each, every target the type-level
    // wildcard.
    let permissions: Vec<_> = page
        .grants
        .iter()
        .filter(|g| g.entitlement != "member")
        .collect();
    assert_eq!(permissions.len(), 6);
    for grant in &permissions {
        assert_eq!(grant.principal, resource.id);
        assert!(grant.target.is_wildcard());
    }
    for target_type in [
        ResourceType::Pod,
        ResourceType::ConfigMap,
        ResourceType::Secret,
    ] {
        for verb in ["get", "list"] {
            assert_eq!(
                permissions
                    .iter()
                    .filter(|g| g.target.resource_type == target_type
                        && g.entitlement == verb)
                    .count(),
                1
            );
        }
    }
}

#[tokio::test]
async fn wildcard_verbs_with_group_subject() {
    let mut fake = FakeKube::new();
    fake.roles.push(role(
        "test-ns",
        "pod-admin",
        vec![rule(&["*"], &[""], &["pods"])],
    ));

    let mut provider = MockRoleBindingProvider::new();
    provider.add_binding(
        "test-ns",
        "pod-admin",
        role_binding(
            "test-ns",
            "admin-pods-binding",
            RoleRefKind::Role,
            "pod-admin",
            vec![group_subject("admins")],
        ),
    );
    // A second binding must not change the permission-edge count.
    provider.add_binding(
        "test-ns",
        "pod-admin",
        role_binding(
            "test-ns",
            "second-binding",
            RoleRefKind::Role,
            "pod-admin",
            vec![user_subject("alice")],
        ),
    );

    let builder = builder(fake, provider);
    let resource = role_resource("test-ns", "pod-admin");
    let page = builder.grants(&resource, "").await.unwrap();

    let permissions: Vec<_> = page
        .grants
        .iter()
        .filter(|g| g.entitlement != "member")
        .collect();
    assert_eq!(permissions.len(), 8);
    for grant in &permissions {
        assert_eq!(grant.target.resource_type, ResourceType::Pod);
        assert!(grant.target.is_wildcard());
        assert_eq!(grant.principal, resource.id);
    }

    let group_memberships = page
        .grants
        .iter()
        .filter(|g| {
            g.entitlement == "member"
                && g.principal.resource_type == ResourceType::KubeGroup
                && g.principal.resource == "admins"
        })
        .count();
    assert_eq!(group_memberships, 1);
}

#[tokio::test]
async fn service_account_inherits_binding_namespace() {
    let mut fake = FakeKube::new();
    fake.roles
        .push(role("ns-a", "pod-reader", vec![rule(&["get"], &[""], &["pods"])]));

    let mut provider = MockRoleBindingProvider::new();
    provider.add_binding(
        "ns-a",
        "pod-reader",
        role_binding(
            "ns-a",
            "sa-binding",
            RoleRefKind::Role,
            "pod-reader",
            vec![service_account_subject("sys", None)],
        ),
    );

    let builder = builder(fake, provider);
    let resource = role_resource("ns-a", "pod-reader");
    let page = builder.grants(&resource, "").await.unwrap();

    let membership = page
        .grants
        .iter()
        .find(|g| g.entitlement == "member")
        .expect("membership edge");
    assert_eq!(
        membership.principal.resource_type,
        ResourceType::ServiceAccount
    );
    assert_eq!(membership.principal.resource, "ns-a/sys");
}

#[tokio::test]
async fn unsupported_subjects_are_skipped_not_fatal() {
    let mut fake = FakeKube::new();
    fake.roles
        .push(role("ns-a", "pod-reader", vec![rule(&["get"], &[""], &["pods"])]));

    let mut provider = MockRoleBindingProvider::new();
    provider.add_binding(
        "ns-a",
        "pod-reader",
        role_binding(
            "ns-a",
            "mixed-binding",
            RoleRefKind::Role,
            "pod-reader",
            vec![
                Subject {
                    kind: SubjectKind::Other("Robot".to_string()),
                    name: "r2".to_string(),
                    namespace: None,
                    api_group: None,
                },
                user_subject("alice"),
            ],
        ),
    );

    let builder = builder(fake, provider);
    let resource = role_resource("ns-a", "pod-reader");
    let page = builder.grants(&resource, "").await.unwrap();

    let memberships: Vec<_> = page
        .grants
        .iter()
        .filter(|g| g.entitlement == "member")
        .collect();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].principal.resource, "alice");
}

#[tokio::test]
async fn malformed_resource_id_is_an_error() {
    let mut fake = FakeKube::new();
    fake.roles
        .push(role("ns-a", "pod-reader", vec![rule(&["get"], &[""], &["pods"])]));

    let builder = builder(fake, MockRoleBindingProvider::new());
    let resource = Resource::new(ResourceId::new(ResourceType::Role, "not-namespaced"), "bad");

    let result = builder.grants(&resource, "").await;
    assert!(matches!(result, Err(CoreError::InvalidResourceId { .. })));
}

#[tokio::test]
async fn list_emits_namespaced_ids_with_parents() {
    let mut fake = FakeKube::new();
    fake.roles
        .push(role("test-ns", "test-role", vec![rule(&["get"], &[""], &["pods"])]));

    let builder = builder(fake, MockRoleBindingProvider::new());
    let page = builder.list(None, "").await.unwrap();

    assert_eq!(page.resources.len(), 1);
    let resource = &page.resources[0];
    assert_eq!(resource.display_name, "test-role");
    assert_eq!(resource.id.resource, "test-ns/test-role");
    assert_eq!(resource.id.resource_type, ResourceType::Role);
    let parent = resource.parent_id.as_ref().expect("namespace parent");
    assert_eq!(parent.resource_type, ResourceType::Namespace);
    assert_eq!(parent.resource, "test-ns");
    assert!(page.next_page_token.is_empty());
}
