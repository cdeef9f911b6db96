//! Shared test doubles: a counting fake Kubernetes API and mock binding
//! providers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use kubegraph_connector::{ClusterRoleBindingProvider, RoleBindingProvider};
use kubegraph_core::Result;
use kubegraph_k8s::apps::{DaemonSet, Deployment, StatefulSet};
use kubegraph_k8s::corev1::{ConfigMap, Namespace, Node, Pod, Secret, ServiceAccount};
use kubegraph_k8s::error::{ApiError, ApiResult};
use kubegraph_k8s::meta::{ListMeta, ListParams, ObjectList, ObjectMeta};
use kubegraph_k8s::rbac::{
    ClusterRole, ClusterRoleBinding, PolicyRule, Role, RoleBinding, RoleRef, RoleRefKind,
    Subject, SubjectKind,
};
use kubegraph_k8s::KubeApi;

/// In-memory [`KubeApi`] double.
///
/// Pagination serves `page_size` items per call (continue token = start
/// index); binding list calls are counted, and the first
/// `fail_role_binding_pages` RoleBinding calls fail to exercise load
/// rollback.
#[derive(Default)]
pub struct FakeKube {
    pub namespaces: Vec<Namespace>,
    pub roles: Vec<Role>,
    pub cluster_roles: Vec<ClusterRole>,
    pub role_bindings: Vec<RoleBinding>,
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
    /// Items served per page; 0 respects the caller's limit.
    pub page_size: usize,
    pub fail_role_binding_pages: AtomicUsize,
    pub role_binding_calls: AtomicUsize,
    pub cluster_role_binding_calls: AtomicUsize,
}

impl FakeKube {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_of<T: Clone>(&self, items: &[T], params: &ListParams) -> ObjectList<T> {
        let start = params
            .continue_token
            .as_deref()
            .and_then(|token| token.parse::<usize>().ok())
            .unwrap_or(0);
        let limit = if self.page_size > 0 {
            self.page_size
        } else {
            (params.limit as usize).max(1)
        };
        let end = (start + limit).min(items.len());
        let continue_token = (end < items.len()).then(|| end.to_string());
        ObjectList {
            metadata: ListMeta { continue_token },
            items: items[start..end].to_vec(),
        }
    }
}

#[async_trait]
impl KubeApi for FakeKube {
    async fn list_namespaces(&self, params: &ListParams) -> ApiResult<ObjectList<Namespace>> {
        Ok(self.page_of(&self.namespaces, params))
    }

    async fn list_pods(&self, params: &ListParams) -> ApiResult<ObjectList<Pod>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_secrets(&self, params: &ListParams) -> ApiResult<ObjectList<Secret>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_config_maps(&self, params: &ListParams) -> ApiResult<ObjectList<ConfigMap>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_nodes(&self, params: &ListParams) -> ApiResult<ObjectList<Node>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_service_accounts(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ServiceAccount>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_deployments(&self, params: &ListParams) -> ApiResult<ObjectList<Deployment>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_stateful_sets(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<StatefulSet>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_daemon_sets(&self, params: &ListParams) -> ApiResult<ObjectList<DaemonSet>> {
        Ok(self.page_of(&[], params))
    }

    async fn list_roles(&self, params: &ListParams) -> ApiResult<ObjectList<Role>> {
        Ok(self.page_of(&self.roles, params))
    }

    async fn get_role(&self, namespace: &str, name: &str) -> ApiResult<Role> {
        self.roles
            .iter()
            .find(|role| {
                role.metadata.namespace.as_deref() == Some(namespace)
                    && role.metadata.name == name
            })
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("roles.rbac.authorization.k8s.io {namespace}/{name} not found"),
            })
    }

    async fn list_cluster_roles(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ClusterRole>> {
        Ok(self.page_of(&self.cluster_roles, params))
    }

    async fn get_cluster_role(&self, name: &str) -> ApiResult<ClusterRole> {
        self.cluster_roles
            .iter()
            .find(|role| role.metadata.name == name)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("clusterroles.rbac.authorization.k8s.io {name} not found"),
            })
    }

    async fn list_role_bindings(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<RoleBinding>> {
        self.role_binding_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_role_binding_pages.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_role_binding_pages
                .store(remaining - 1, Ordering::SeqCst);
            return Err(ApiError::Status {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(self.page_of(&self.role_bindings, params))
    }

    async fn list_cluster_role_bindings(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ClusterRoleBinding>> {
        self.cluster_role_binding_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.page_of(&self.cluster_role_bindings, params))
    }
}

/// Mock [`RoleBindingProvider`] keyed by `namespace/roleName`.
#[derive(Default)]
pub struct MockRoleBindingProvider {
    bindings: HashMap<String, Vec<RoleBinding>>,
}

impl MockRoleBindingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binding(&mut self, namespace: &str, role_name: &str, binding: RoleBinding) {
        self.bindings
            .entry(format!("{namespace}/{role_name}"))
            .or_default()
            .push(binding);
    }
}

#[async_trait]
impl RoleBindingProvider for MockRoleBindingProvider {
    async fn matching_role_bindings(
        &self,
        namespace: &str,
        role_name: &str,
    ) -> Result<Vec<RoleBinding>> {
        Ok(self
            .bindings
            .get(&format!("{namespace}/{role_name}"))
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock [`ClusterRoleBindingProvider`] keyed by cluster role name.
#[derive(Default)]
pub struct MockClusterRoleBindingProvider {
    role_bindings: HashMap<String, Vec<RoleBinding>>,
    cluster_role_bindings: HashMap<String, Vec<ClusterRoleBinding>>,
}

impl MockClusterRoleBindingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_role_binding(&mut self, cluster_role: &str, binding: RoleBinding) {
        self.role_bindings
            .entry(cluster_role.to_string())
            .or_default()
            .push(binding);
    }

    pub fn add_cluster_role_binding(&mut self, cluster_role: &str, binding: ClusterRoleBinding) {
        self.cluster_role_bindings
            .entry(cluster_role.to_string())
            .or_default()
            .push(binding);
    }
}

#[async_trait]
impl ClusterRoleBindingProvider for MockClusterRoleBindingProvider {
    async fn matching_bindings_for_cluster_role(
        &self,
        name: &str,
    ) -> Result<(Vec<RoleBinding>, Vec<ClusterRoleBinding>)> {
        Ok((
            self.role_bindings.get(name).cloned().unwrap_or_default(),
            self.cluster_role_bindings
                .get(name)
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Object construction helpers
// ---------------------------------------------------------------------------

pub fn meta(namespace: Option<&str>, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
        uid: Some(format!("uid-{name}")),
        ..ObjectMeta::default()
    }
}

pub fn rule(verbs: &[&str], api_groups: &[&str], resources: &[&str]) -> PolicyRule {
    PolicyRule {
        verbs: verbs.iter().map(|s| s.to_string()).collect(),
        api_groups: api_groups.iter().map(|s| s.to_string()).collect(),
        resources: resources.iter().map(|s| s.to_string()).collect(),
        ..PolicyRule::default()
    }
}

pub fn role(namespace: &str, name: &str, rules: Vec<PolicyRule>) -> Role {
    Role {
        metadata: meta(Some(namespace), name),
        rules,
    }
}

pub fn cluster_role(name: &str, rules: Vec<PolicyRule>) -> ClusterRole {
    ClusterRole {
        metadata: meta(None, name),
        rules,
        aggregation_rule: None,
    }
}

pub fn user_subject(name: &str) -> Subject {
    Subject {
        kind: SubjectKind::User,
        name: name.to_string(),
        namespace: None,
        api_group: Some("rbac.authorization.k8s.io".to_string()),
    }
}

pub fn group_subject(name: &str) -> Subject {
    Subject {
        kind: SubjectKind::Group,
        name: name.to_string(),
        namespace: None,
        api_group: Some("rbac.authorization.k8s.io".to_string()),
    }
}

pub fn service_account_subject(name: &str, namespace: Option<&str>) -> Subject {
    Subject {
        kind: SubjectKind::ServiceAccount,
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
        api_group: None,
    }
}

pub fn role_binding(
    namespace: &str,
    name: &str,
    role_ref_kind: RoleRefKind,
    role_name: &str,
    subjects: Vec<Subject>,
) -> RoleBinding {
    RoleBinding {
        metadata: meta(Some(namespace), name),
        subjects,
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: role_ref_kind,
            name: role_name.to_string(),
        },
    }
}

pub fn cluster_role_binding(
    name: &str,
    role_name: &str,
    subjects: Vec<Subject>,
) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: meta(None, name),
        subjects,
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_string(),
            kind: RoleRefKind::ClusterRole,
            name: role_name.to_string(),
        },
    }
}

pub fn namespace(name: &str) -> Namespace {
    Namespace {
        metadata: meta(None, name),
        status: None,
    }
}
