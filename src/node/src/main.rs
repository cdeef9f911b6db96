//! Kubegraph connector binary
//!
//! Reads a cluster's RBAC configuration and inventory over the Kubernetes
//! API and emits the compiled authorization graph as JSON lines.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use kubegraph_connector::{ConnectorOpts, Kubernetes};
use kubegraph_k8s::{ClientConfig, HttpKubeClient, KubeApi};

mod config;
mod runner;

use config::ConnectorConfig;
use runner::SyncRunner;

/// Kubegraph connector CLI
#[derive(Parser)]
#[command(name = "kubegraph")]
#[command(about = "Compiles Kubernetes RBAC into an authorization graph")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "KUBEGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// API server address (overrides config)
    #[arg(long, env = "KUBEGRAPH_SERVER")]
    server: Option<String>,

    /// Bearer token for API authentication (overrides config)
    #[arg(long, env = "KUBEGRAPH_TOKEN")]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure_skip_tls_verify: bool,

    /// Skip syncing pods
    #[arg(long)]
    skip_pods: bool,

    /// Write the sync output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser)]
enum Command {
    /// Check connectivity and permissions against the cluster
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{log_level},kubegraph=debug").into()),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    // Load configuration, then apply CLI overrides.
    let mut config = match &cli.config {
        Some(path) => {
            let config = ConnectorConfig::load(path)?;
            info!("loaded configuration from {}", path.display());
            config
        }
        None => ConnectorConfig::default(),
    };
    if let Some(server) = cli.server {
        config.cluster.api_server = server;
    }
    if let Some(token) = cli.token {
        config.cluster.bearer_token = Some(token);
        config.cluster.bearer_token_file = None;
    }
    if cli.insecure_skip_tls_verify {
        config.cluster.insecure_skip_tls_verify = true;
    }
    if cli.skip_pods {
        config.sync.pods = false;
    }
    config.validate()?;

    let connector = build_connector(&config)?;

    if let Some(Command::Validate) = cli.command {
        connector.validate().await.context("validating connection")?;
        info!("connection validated");
        return Ok(());
    }

    info!("starting sync");
    let runner = SyncRunner::new(connector);
    let stats = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let stats = runner.run(&mut out).await?;
            out.flush().context("flushing output file")?;
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            runner.run(&mut out).await?
        }
    };

    info!(
        resources = stats.resources,
        entitlements = stats.entitlements,
        grants = stats.grants,
        "sync complete"
    );
    Ok(())
}

fn build_connector(config: &ConnectorConfig) -> Result<Arc<Kubernetes>> {
    let timeout = match config.cluster.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let client = HttpKubeClient::new(ClientConfig {
        api_server: config.cluster.api_server.clone(),
        bearer_token: config.resolve_bearer_token()?,
        accept_invalid_certs: config.cluster.insecure_skip_tls_verify,
        timeout,
    })
    .context("building kubernetes client")?;

    let opts = ConnectorOpts {
        sync_pods: config.sync.pods,
    };
    Ok(Arc::new(Kubernetes::new(
        Arc::new(client) as Arc<dyn KubeApi>,
        opts,
    )))
}
