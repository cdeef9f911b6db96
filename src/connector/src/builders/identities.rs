//! Two-phase binding-subject scan shared by the kube_user and kube_group
//! enumerators
//!
//! Users and groups have no list endpoint; they exist only as binding
//! subjects. The enumeration drains all RoleBindings first, then all
//! ClusterRoleBindings, multiplexing the phase into the opaque cursor as an
//! explicit tagged state. A per-enumerator seen-set deduplicates identities
//! across pages and phases; it lives for the enumerator instance, matching
//! the lifetime of one sync pass.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use kubegraph_core::pagination::{decode_token, encode_token};
use kubegraph_core::Result;
use kubegraph_k8s::meta::ListParams;
use kubegraph_k8s::rbac::{Subject, SubjectKind};
use kubegraph_k8s::KubeApi;

use crate::RESOURCES_PAGE_SIZE;

/// Cursor over the two upstream binding lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub(crate) enum BindingScanCursor {
    RoleBindings {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        continue_token: Option<String>,
    },
    ClusterRoleBindings {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        continue_token: Option<String>,
    },
}

impl Default for BindingScanCursor {
    fn default() -> Self {
        BindingScanCursor::RoleBindings {
            continue_token: None,
        }
    }
}

/// One page of newly-seen identity names plus the outgoing cursor.
pub(crate) struct ScanPage {
    pub names: Vec<String>,
    pub next_page_token: String,
}

fn collect_subjects(
    subjects: impl Iterator<Item = Subject>,
    kind: &SubjectKind,
    seen: &Mutex<HashSet<String>>,
    names: &mut Vec<String>,
) {
    let mut seen = seen.lock();
    for subject in subjects {
        if &subject.kind == kind && seen.insert(subject.name.clone()) {
            names.push(subject.name);
        }
    }
}

/// Fetches one upstream page for the cursor's current phase and collects the
/// matching subject names not seen before by this enumerator.
pub(crate) async fn scan_binding_subjects(
    api: &dyn KubeApi,
    page_token: &str,
    kind: &SubjectKind,
    seen: &Mutex<HashSet<String>>,
) -> Result<ScanPage> {
    let cursor: BindingScanCursor = decode_token(page_token)?.unwrap_or_default();
    let mut names = Vec::new();

    let next = match cursor {
        BindingScanCursor::RoleBindings { continue_token } => {
            let page = api
                .list_role_bindings(&ListParams::page(
                    RESOURCES_PAGE_SIZE,
                    continue_token.as_deref(),
                ))
                .await?;
            collect_subjects(
                page.items.iter().flat_map(|b| b.subjects.iter().cloned()),
                kind,
                seen,
                &mut names,
            );
            match page.continue_token() {
                Some(token) => Some(BindingScanCursor::RoleBindings {
                    continue_token: Some(token.to_string()),
                }),
                // RoleBindings drained; the next call starts on
                // ClusterRoleBindings.
                None => Some(BindingScanCursor::ClusterRoleBindings {
                    continue_token: None,
                }),
            }
        }
        BindingScanCursor::ClusterRoleBindings { continue_token } => {
            let page = api
                .list_cluster_role_bindings(&ListParams::page(
                    RESOURCES_PAGE_SIZE,
                    continue_token.as_deref(),
                ))
                .await?;
            collect_subjects(
                page.items.iter().flat_map(|b| b.subjects.iter().cloned()),
                kind,
                seen,
                &mut names,
            );
            page.continue_token()
                .map(|token| BindingScanCursor::ClusterRoleBindings {
                    continue_token: Some(token.to_string()),
                })
        }
    };

    let next_page_token = match next {
        Some(cursor) => encode_token(&cursor)?,
        None => String::new(),
    };

    Ok(ScanPage {
        names,
        next_page_token,
    })
}
