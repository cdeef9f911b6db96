//! Sync runner: drives every syncer page-by-page and emits the inventory
//! and graph edges as JSON lines.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use kubegraph_connector::Kubernetes;
use kubegraph_core::{Entitlement, Grant, Resource};

/// One emitted sync record.
#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum SyncRecord<'a> {
    Resource(&'a Resource),
    Entitlement(&'a Entitlement),
    Grant(&'a Grant),
}

/// Totals for one sync pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncStats {
    pub resources: usize,
    pub entitlements: usize,
    pub grants: usize,
}

pub struct SyncRunner {
    connector: Arc<Kubernetes>,
}

impl SyncRunner {
    pub fn new(connector: Arc<Kubernetes>) -> Self {
        Self { connector }
    }

    /// Runs a full sync across every syncer, writing records to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<SyncStats> {
        let mut stats = SyncStats::default();

        for syncer in self.connector.resource_syncers() {
            let kind = syncer.resource_type();
            info!(resource_type = kind.id(), "syncing resource type");

            let mut page_token = String::new();
            loop {
                let page = syncer
                    .list(None, &page_token)
                    .await
                    .with_context(|| format!("listing {}", kind.id()))?;

                for resource in &page.resources {
                    emit(out, &SyncRecord::Resource(resource))?;
                    stats.resources += 1;

                    let mut ent_token = String::new();
                    loop {
                        let ents = syncer
                            .entitlements(resource, &ent_token)
                            .await
                            .with_context(|| {
                                format!("entitlements for {}", resource.id)
                            })?;
                        for entitlement in &ents.entitlements {
                            emit(out, &SyncRecord::Entitlement(entitlement))?;
                            stats.entitlements += 1;
                        }
                        if ents.next_page_token.is_empty() {
                            break;
                        }
                        ent_token = ents.next_page_token;
                    }

                    let mut grant_token = String::new();
                    loop {
                        let grants = syncer
                            .grants(resource, &grant_token)
                            .await
                            .with_context(|| format!("grants for {}", resource.id))?;
                        for grant in &grants.grants {
                            emit(out, &SyncRecord::Grant(grant))?;
                            stats.grants += 1;
                        }
                        if grants.next_page_token.is_empty() {
                            break;
                        }
                        grant_token = grants.next_page_token;
                    }
                }

                if page.next_page_token.is_empty() {
                    break;
                }
                page_token = page.next_page_token;
            }

            debug!(resource_type = kind.id(), "resource type synced");
        }

        Ok(stats)
    }
}

fn emit<W: Write>(out: &mut W, record: &SyncRecord<'_>) -> Result<()> {
    let line = serde_json::to_string(record).context("serializing sync record")?;
    writeln!(out, "{line}").context("writing sync record")?;
    Ok(())
}
