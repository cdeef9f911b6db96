//! The Kubernetes connector: owns the API handle, options, and the shared
//! binding cache, and hands the host one syncer per object kind.

use std::sync::Arc;

use async_trait::async_trait;

use kubegraph_core::{ResourceSyncer, Result};
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::rbac::{ClusterRoleBinding, RoleBinding};
use kubegraph_k8s::KubeApi;

use crate::bindings::{BindingCache, ClusterRoleBindingProvider, RoleBindingProvider};
use crate::builders::{
    ClusterRoleBuilder, ConfigMapBuilder, DaemonSetBuilder, DeploymentBuilder, KubeGroupBuilder,
    KubeUserBuilder, NamespaceBuilder, NodeBuilder, PodBuilder, RoleBuilder,
    ServiceAccountBuilder, SecretBuilder, StatefulSetBuilder,
};

/// Connector options.
#[derive(Debug, Clone)]
pub struct ConnectorOpts {
    /// Sync pods as inventory objects. On by default; large clusters may
    /// turn it off to keep sync sizes down.
    pub sync_pods: bool,
}

impl Default for ConnectorOpts {
    fn default() -> Self {
        Self { sync_pods: true }
    }
}

/// Connector descriptor reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMetadata {
    pub display_name: String,
    pub description: String,
}

/// Kubernetes connector instance.
pub struct Kubernetes {
    api: Arc<dyn KubeApi>,
    opts: ConnectorOpts,
    bindings: BindingCache,
}

impl Kubernetes {
    pub fn new(api: Arc<dyn KubeApi>, opts: ConnectorOpts) -> Self {
        Self {
            api,
            opts,
            bindings: BindingCache::new(),
        }
    }

    /// One syncer per object kind. The Role and ClusterRole syncers share
    /// this connector's binding cache through the provider traits.
    pub fn resource_syncers(self: &Arc<Self>) -> Vec<Box<dyn ResourceSyncer>> {
        let api = || Arc::clone(&self.api);
        let role_provider: Arc<dyn RoleBindingProvider> = self.clone();
        let cluster_provider: Arc<dyn ClusterRoleBindingProvider> = self.clone();

        let mut syncers: Vec<Box<dyn ResourceSyncer>> = vec![
            Box::new(NamespaceBuilder::new(api())),
            Box::new(ServiceAccountBuilder::new(api())),
            Box::new(RoleBuilder::new(api(), role_provider)),
            Box::new(ClusterRoleBuilder::new(api(), cluster_provider)),
            Box::new(SecretBuilder::new(api())),
            Box::new(ConfigMapBuilder::new(api())),
            Box::new(NodeBuilder::new(api())),
            Box::new(DeploymentBuilder::new(api())),
            Box::new(StatefulSetBuilder::new(api())),
            Box::new(DaemonSetBuilder::new(api())),
        ];
        if self.opts.sync_pods {
            syncers.push(Box::new(PodBuilder::new(api())));
        }
        syncers.push(Box::new(KubeUserBuilder::new(api())));
        syncers.push(Box::new(KubeGroupBuilder::new(api())));
        syncers
    }

    pub fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            display_name: "Kubernetes".to_string(),
            description: "Connector for Kubernetes resources and RBAC permissions".to_string(),
        }
    }

    /// Connectivity probe: lists a single namespace. Unauthorized and
    /// forbidden responses surface as distinct errors.
    pub async fn validate(&self) -> Result<()> {
        self.api.list_namespaces(&ListParams::page(1, None)).await?;
        Ok(())
    }
}

#[async_trait]
impl RoleBindingProvider for Kubernetes {
    async fn matching_role_bindings(
        &self,
        namespace: &str,
        role_name: &str,
    ) -> Result<Vec<RoleBinding>> {
        self.bindings.ensure_loaded(self.api.as_ref()).await?;
        Ok(self
            .bindings
            .matching_role_bindings(namespace, role_name)
            .await)
    }
}

#[async_trait]
impl ClusterRoleBindingProvider for Kubernetes {
    async fn matching_bindings_for_cluster_role(
        &self,
        name: &str,
    ) -> Result<(Vec<RoleBinding>, Vec<ClusterRoleBinding>)> {
        self.bindings.ensure_loaded(self.api.as_ref()).await?;
        Ok(self.bindings.matching_for_cluster_role(name).await)
    }
}
