//! HTTP implementation of [`KubeApi`] over the Kubernetes REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::apps::{DaemonSet, Deployment, StatefulSet};
use crate::client::KubeApi;
use crate::corev1::{ConfigMap, Namespace, Node, Pod, Secret, ServiceAccount};
use crate::error::{ApiError, ApiResult};
use crate::meta::{ListParams, ObjectList};
use crate::rbac::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};

const CORE_V1: &str = "/api/v1";
const APPS_V1: &str = "/apis/apps/v1";
const RBAC_V1: &str = "/apis/rbac.authorization.k8s.io/v1";

/// Connection settings for the API server.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. `https://10.0.0.1:6443`.
    pub api_server: String,
    /// Bearer token sent with every request.
    pub bearer_token: Option<String>,
    /// Skip TLS certificate verification. Insecure; intended for dev
    /// clusters with self-signed certs.
    pub accept_invalid_certs: bool,
    /// Per-request timeout; `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

/// A [`KubeApi`] implementation backed by a reqwest client.
pub struct HttpKubeClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

/// Error body shape returned by the API server on failures.
#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    message: String,
}

impl HttpKubeClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let base = config.api_server.trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(ApiError::Configuration(
                "api server address is required".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base,
            token: config.bearer_token,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&ListParams>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base, path);
        debug!(%url, "kubernetes api request");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(params) = params {
            let mut query: Vec<(&str, String)> = vec![("limit", params.limit.to_string())];
            if let Some(cursor) = &params.continue_token {
                query.push(("continue", cursor.clone()));
            }
            request = request.query(&query);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(ApiError::Forbidden);
        }
        if !status.is_success() {
            let message = match response.json::<StatusBody>().await {
                Ok(body) if !body.message.is_empty() => body.message,
                _ => status.to_string(),
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ListParams,
    ) -> ApiResult<ObjectList<T>> {
        self.get_json(path, Some(params)).await
    }
}

#[async_trait]
impl KubeApi for HttpKubeClient {
    async fn list_namespaces(&self, params: &ListParams) -> ApiResult<ObjectList<Namespace>> {
        self.list(&format!("{CORE_V1}/namespaces"), params).await
    }

    async fn list_pods(&self, params: &ListParams) -> ApiResult<ObjectList<Pod>> {
        self.list(&format!("{CORE_V1}/pods"), params).await
    }

    async fn list_secrets(&self, params: &ListParams) -> ApiResult<ObjectList<Secret>> {
        self.list(&format!("{CORE_V1}/secrets"), params).await
    }

    async fn list_config_maps(&self, params: &ListParams) -> ApiResult<ObjectList<ConfigMap>> {
        self.list(&format!("{CORE_V1}/configmaps"), params).await
    }

    async fn list_nodes(&self, params: &ListParams) -> ApiResult<ObjectList<Node>> {
        self.list(&format!("{CORE_V1}/nodes"), params).await
    }

    async fn list_service_accounts(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ServiceAccount>> {
        self.list(&format!("{CORE_V1}/serviceaccounts"), params)
            .await
    }

    async fn list_deployments(&self, params: &ListParams) -> ApiResult<ObjectList<Deployment>> {
        self.list(&format!("{APPS_V1}/deployments"), params).await
    }

    async fn list_stateful_sets(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<StatefulSet>> {
        self.list(&format!("{APPS_V1}/statefulsets"), params).await
    }

    async fn list_daemon_sets(&self, params: &ListParams) -> ApiResult<ObjectList<DaemonSet>> {
        self.list(&format!("{APPS_V1}/daemonsets"), params).await
    }

    async fn list_roles(&self, params: &ListParams) -> ApiResult<ObjectList<Role>> {
        self.list(&format!("{RBAC_V1}/roles"), params).await
    }

    async fn get_role(&self, namespace: &str, name: &str) -> ApiResult<Role> {
        self.get_json(&format!("{RBAC_V1}/namespaces/{namespace}/roles/{name}"), None)
            .await
    }

    async fn list_cluster_roles(&self, params: &ListParams) -> ApiResult<ObjectList<ClusterRole>> {
        self.list(&format!("{RBAC_V1}/clusterroles"), params).await
    }

    async fn get_cluster_role(&self, name: &str) -> ApiResult<ClusterRole> {
        self.get_json(&format!("{RBAC_V1}/clusterroles/{name}"), None)
            .await
    }

    async fn list_role_bindings(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<RoleBinding>> {
        self.list(&format!("{RBAC_V1}/rolebindings"), params).await
    }

    async fn list_cluster_role_bindings(
        &self,
        params: &ListParams,
    ) -> ApiResult<ObjectList<ClusterRoleBinding>> {
        self.list(&format!("{RBAC_V1}/clusterrolebindings"), params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_server() {
        let result = HttpKubeClient::new(ClientConfig::default());
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = HttpKubeClient::new(ClientConfig {
            api_server: "https://cluster.local:6443/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base, "https://cluster.local:6443");
    }
}
