//! Connector configuration loading and validation

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Complete connector configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub cluster: ClusterSection,

    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClusterSection {
    /// API server base URL, e.g. `https://10.0.0.1:6443`.
    #[serde(default)]
    pub api_server: String,

    /// Bearer token sent with every request.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// File to read the bearer token from (e.g. a mounted service account
    /// token). Mutually exclusive with `bearer_token`.
    #[serde(default)]
    pub bearer_token_file: Option<PathBuf>,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout in seconds; 0 disables the client-side timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSection {
    /// Sync pods as inventory objects.
    #[serde(default = "default_true")]
    pub pods: bool,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self { pods: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl ConnectorConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: ConnectorConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Validates the configuration after CLI overrides are applied.
    pub fn validate(&self) -> Result<()> {
        if self.cluster.api_server.is_empty() {
            bail!("cluster.api_server is required (or pass --server)");
        }
        if !self.cluster.api_server.starts_with("http://")
            && !self.cluster.api_server.starts_with("https://")
        {
            bail!(
                "cluster.api_server must be an http(s) URL, got {:?}",
                self.cluster.api_server
            );
        }
        if self.cluster.bearer_token.is_some() && self.cluster.bearer_token_file.is_some() {
            bail!("cluster.bearer_token and cluster.bearer_token_file are mutually exclusive");
        }
        Ok(())
    }

    /// Resolves the effective bearer token, reading the token file if one is
    /// configured.
    pub fn resolve_bearer_token(&self) -> Result<Option<String>> {
        if let Some(token) = &self.cluster.bearer_token {
            return Ok(Some(token.clone()));
        }
        if let Some(path) = &self.cluster.bearer_token_file {
            let token = fs::read_to_string(path)
                .with_context(|| format!("reading bearer token file {}", path.display()))?;
            return Ok(Some(token.trim().to_string()));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let config: ConnectorConfig = toml::from_str(
            r#"
            [cluster]
            api_server = "https://cluster.local:6443"
            "#,
        )
        .unwrap();
        assert_eq!(config.cluster.api_server, "https://cluster.local:6443");
        assert_eq!(config.cluster.request_timeout_secs, 30);
        assert!(config.sync.pods);
        config.validate().unwrap();
    }

    #[test]
    fn load_reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [cluster]
            api_server = "https://10.0.0.1:6443"
            insecure_skip_tls_verify = true

            [sync]
            pods = false
            "#
        )
        .unwrap();

        let config = ConnectorConfig::load(file.path()).unwrap();
        assert!(config.cluster.insecure_skip_tls_verify);
        assert!(!config.sync.pods);
    }

    #[test]
    fn missing_api_server_fails_validation() {
        let config = ConnectorConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_api_server_fails_validation() {
        let mut config = ConnectorConfig::default();
        config.cluster.api_server = "cluster.local:6443".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_and_token_file_are_exclusive() {
        let mut config = ConnectorConfig::default();
        config.cluster.api_server = "https://cluster.local:6443".to_string();
        config.cluster.bearer_token = Some("abc".to_string());
        config.cluster.bearer_token_file = Some(PathBuf::from("/var/run/token"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn bearer_token_file_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret-token").unwrap();

        let mut config = ConnectorConfig::default();
        config.cluster.bearer_token_file = Some(file.path().to_path_buf());
        assert_eq!(
            config.resolve_bearer_token().unwrap().as_deref(),
            Some("secret-token")
        );
    }
}
