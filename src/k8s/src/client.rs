//! The upstream API capability trait
//!
//! One method per list endpoint the connector reads, plus point reads for
//! the two policy kinds. Listings of namespaced kinds are cluster-wide
//! (all namespaces); every call takes a page-size limit and the opaque
//! upstream continuation cursor.

use async_trait::async_trait;

use crate::apps::{DaemonSet, Deployment, StatefulSet};
use crate::corev1::{ConfigMap, Namespace, Node, Pod, Secret, ServiceAccount};
use crate::error::ApiResult;
use crate::meta::{ListParams, ObjectList};
use crate::rbac::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};

#[async_trait]
pub trait KubeApi: Send + Sync {
    async fn list_namespaces(&self, params: &ListParams) -> ApiResult<ObjectList<Namespace>>;

    async fn list_pods(&self, params: &ListParams) -> ApiResult<ObjectList<Pod>>;

    async fn list_secrets(&self, params: &ListParams) -> ApiResult<ObjectList<Secret>>;

    async fn list_config_maps(&self, params: &ListParams) -> ApiResult<ObjectList<ConfigMap>>;

    async fn list_nodes(&self, params: &ListParams) -> ApiResult<ObjectList<Node>>;

    async fn list_service_accounts(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ServiceAccount>>;

    async fn list_deployments(&self, params: &ListParams) -> ApiResult<ObjectList<Deployment>>;

    async fn list_stateful_sets(&self, params: &ListParams)
        -> ApiResult<ObjectList<StatefulSet>>;

    async fn list_daemon_sets(&self, params: &ListParams) -> ApiResult<ObjectList<DaemonSet>>;

    async fn list_roles(&self, params: &ListParams) -> ApiResult<ObjectList<Role>>;

    async fn get_role(&self, namespace: &str, name: &str) -> ApiResult<Role>;

    async fn list_cluster_roles(&self, params: &ListParams) -> ApiResult<ObjectList<ClusterRole>>;

    async fn get_cluster_role(&self, name: &str) -> ApiResult<ClusterRole>;

    async fn list_role_bindings(&self, params: &ListParams)
        -> ApiResult<ObjectList<RoleBinding>>;

    async fn list_cluster_role_bindings(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ClusterRoleBinding>>;
}
