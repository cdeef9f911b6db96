//! Binding subject to principal identity resolution

use kubegraph_core::{CoreError, ResourceId, ResourceType, Result};
use kubegraph_k8s::rbac::{Subject, SubjectKind};

/// Resolves a binding subject to its principal identity key.
///
/// ServiceAccounts key as `namespace/name`; a subject without an explicit
/// namespace inherits the binding's namespace, and fails as unresolvable
/// when there is none (always the case for ClusterRoleBindings). Users and
/// groups are cluster-scoped and key by name verbatim, including names such
/// as `system:masters`.
pub fn resolve_subject(
    subject: &Subject,
    binding_namespace: Option<&str>,
) -> Result<ResourceId> {
    match &subject.kind {
        SubjectKind::ServiceAccount => {
            let namespace = subject
                .namespace
                .as_deref()
                .filter(|ns| !ns.is_empty())
                .or_else(|| binding_namespace.filter(|ns| !ns.is_empty()))
                .ok_or_else(|| CoreError::UnresolvableSubject {
                    name: subject.name.clone(),
                })?;
            Ok(ResourceId::new(
                ResourceType::ServiceAccount,
                format!("{namespace}/{}", subject.name),
            ))
        }
        SubjectKind::User => Ok(ResourceId::new(ResourceType::KubeUser, &subject.name)),
        SubjectKind::Group => Ok(ResourceId::new(ResourceType::KubeGroup, &subject.name)),
        SubjectKind::Other(kind) => Err(CoreError::UnsupportedSubjectKind { kind: kind.clone() }),
    }
}
