//! Permission-edge synthesis from policy rules

use tracing::debug;

use kubegraph_core::{Grant, Resource, ResourceId};
use kubegraph_k8s::rbac::PolicyRule;

use crate::mapping::map_kube_resource;
use crate::verbs::determine_grant_verbs;

/// Produces the permission edges a Role or ClusterRole grants through its
/// rules. Edges run `role --verb--> target`, with the role on the holder
/// side; composing them with membership edges is the consumer's job, which
/// keeps synthesis independent of how many members a role has.
///
/// `namespace` is the principal's own namespace context: `Some` for Roles,
/// `None` for ClusterRoles. With explicit `resourceNames` the target key is
/// `namespace/name` when the target type is namespaced and a context exists,
/// else the bare name; without them the target is the type-level `"*"`.
///
/// Non-resource-URL rules, empty verb sets, and unmapped (apiGroup,
/// resource) pairs are skipped without failing the rest of the rule set.
pub fn permission_grants_from_rules(
    principal: &Resource,
    rules: &[PolicyRule],
    namespace: Option<&str>,
) -> Vec<Grant> {
    let mut grants = Vec::new();
    let namespace = namespace.filter(|ns| !ns.is_empty());

    for (index, rule) in rules.iter().enumerate() {
        if !rule.non_resource_urls.is_empty() {
            debug!(
                principal = %principal.id,
                rule = index,
                urls = ?rule.non_resource_urls,
                "skipping non-resource urls in rule"
            );
            continue;
        }

        let grant_verbs = determine_grant_verbs(&rule.verbs);
        if grant_verbs.is_empty() {
            debug!(principal = %principal.id, rule = index, "no effective verbs determined for rule");
            continue;
        }

        for api_group in &rule.api_groups {
            for resource in &rule.resources {
                let Some(target_type) = map_kube_resource(api_group, resource) else {
                    debug!(
                        principal = %principal.id,
                        rule = index,
                        %api_group,
                        %resource,
                        "unmapped resource type for permission grant"
                    );
                    continue;
                };

                if rule.resource_names.is_empty() {
                    // Type-level grant on the wildcard target.
                    let target = ResourceId::wildcard(target_type);
                    for verb in &grant_verbs {
                        grants.push(Grant::new(target.clone(), verb.as_str(), principal.id.clone()));
                    }
                } else {
                    // Grant narrowed to specific object names.
                    for name in &rule.resource_names {
                        let target = match namespace {
                            Some(ns) if target_type.is_namespaced() => {
                                ResourceId::namespaced(target_type, ns, name)
                            }
                            _ => ResourceId::new(target_type, name.clone()),
                        };
                        for verb in &grant_verbs {
                            grants.push(Grant::new(target.clone(), verb.as_str(), principal.id.clone()));
                        }
                    }
                }
            }
        }
    }

    grants
}
