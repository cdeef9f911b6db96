//! Cluster-wide binding cache
//!
//! Every Role/ClusterRole grants query needs the full set of bindings that
//! reference it, and the API server has no reverse index; the connector
//! bulk-loads all RoleBindings and ClusterRoleBindings once and answers
//! matching queries by linear scan. n is bounded by the cluster's total
//! binding count, which at this system's scale is acceptable.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use kubegraph_core::Result;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::rbac::{ClusterRoleBinding, RoleBinding, RoleRefKind};
use kubegraph_k8s::KubeApi;

use crate::RESOURCES_PAGE_SIZE;

/// Source of RoleBindings matching a Role.
#[async_trait]
pub trait RoleBindingProvider: Send + Sync {
    /// All RoleBindings in `namespace` whose roleRef names the Role.
    async fn matching_role_bindings(
        &self,
        namespace: &str,
        role_name: &str,
    ) -> Result<Vec<RoleBinding>>;
}

/// Source of bindings matching a ClusterRole.
#[async_trait]
pub trait ClusterRoleBindingProvider: Send + Sync {
    /// All RoleBindings (any namespace) and ClusterRoleBindings whose
    /// roleRef names the ClusterRole.
    async fn matching_bindings_for_cluster_role(
        &self,
        name: &str,
    ) -> Result<(Vec<RoleBinding>, Vec<ClusterRoleBinding>)>;
}

#[derive(Default)]
struct CacheState {
    loaded: bool,
    role_bindings: Vec<RoleBinding>,
    cluster_role_bindings: Vec<ClusterRoleBinding>,
}

/// Lazily-loaded snapshot of every binding in the cluster.
///
/// The snapshot is taken once, on the first query, and never invalidated for
/// the connector's lifetime: a long-lived process serves a point-in-time
/// graph. A failed load publishes nothing, so the next query retries from
/// scratch.
pub struct BindingCache {
    state: RwLock<CacheState>,
}

impl BindingCache {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Loads both binding kinds if not already loaded.
    ///
    /// Double-checked locking: the flag is checked under the read lock, then
    /// re-checked under the write lock, so concurrent first callers block on
    /// a single upstream enumeration instead of each issuing a full scan.
    pub async fn ensure_loaded(&self, api: &dyn KubeApi) -> Result<()> {
        {
            if self.state.read().await.loaded {
                return Ok(());
            }
        }

        let mut state = self.state.write().await;
        if state.loaded {
            return Ok(());
        }

        debug!("loading role binding and cluster role binding caches");

        let mut role_bindings = Vec::new();
        let mut continue_token: Option<String> = None;
        loop {
            let page = api
                .list_role_bindings(&ListParams::page(
                    RESOURCES_PAGE_SIZE,
                    continue_token.as_deref(),
                ))
                .await?;
            let next = page.continue_token().map(str::to_string);
            role_bindings.extend(page.items);
            match next {
                Some(token) => continue_token = Some(token),
                None => break,
            }
        }

        let mut cluster_role_bindings = Vec::new();
        let mut continue_token: Option<String> = None;
        loop {
            let page = api
                .list_cluster_role_bindings(&ListParams::page(
                    RESOURCES_PAGE_SIZE,
                    continue_token.as_deref(),
                ))
                .await?;
            let next = page.continue_token().map(str::to_string);
            cluster_role_bindings.extend(page.items);
            match next {
                Some(token) => continue_token = Some(token),
                None => break,
            }
        }

        debug!(
            role_bindings = role_bindings.len(),
            cluster_role_bindings = cluster_role_bindings.len(),
            "binding caches loaded"
        );

        state.role_bindings = role_bindings;
        state.cluster_role_bindings = cluster_role_bindings;
        state.loaded = true;

        Ok(())
    }

    /// RoleBindings in `namespace` referencing the named Role.
    pub async fn matching_role_bindings(
        &self,
        namespace: &str,
        role_name: &str,
    ) -> Vec<RoleBinding> {
        let state = self.state.read().await;
        state
            .role_bindings
            .iter()
            .filter(|binding| {
                binding.metadata.namespace.as_deref() == Some(namespace)
                    && binding.role_ref.kind == RoleRefKind::Role
                    && binding.role_ref.name == role_name
            })
            .cloned()
            .collect()
    }

    /// RoleBindings and ClusterRoleBindings referencing the named
    /// ClusterRole.
    pub async fn matching_for_cluster_role(
        &self,
        name: &str,
    ) -> (Vec<RoleBinding>, Vec<ClusterRoleBinding>) {
        let state = self.state.read().await;
        let role_bindings = state
            .role_bindings
            .iter()
            .filter(|binding| {
                binding.role_ref.kind == RoleRefKind::ClusterRole
                    && binding.role_ref.name == name
            })
            .cloned()
            .collect();
        let cluster_role_bindings = state
            .cluster_role_bindings
            .iter()
            .filter(|binding| {
                binding.role_ref.kind == RoleRefKind::ClusterRole
                    && binding.role_ref.name == name
            })
            .cloned()
            .collect();
        (role_bindings, cluster_role_bindings)
    }
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}
