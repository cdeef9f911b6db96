//! rbac.authorization.k8s.io/v1 object models
//!
//! Subject and role-reference kinds are parsed into closed enums at the
//! serde boundary; values outside the modeled set are preserved as
//! `Other(..)` so unsupported kinds surface exactly once, in the resolver,
//! instead of being string-compared all over rule processing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::meta::ObjectMeta;

/// Kind of a binding subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectKind {
    User,
    Group,
    ServiceAccount,
    Other(String),
}

impl From<String> for SubjectKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "User" => SubjectKind::User,
            "Group" => SubjectKind::Group,
            "ServiceAccount" => SubjectKind::ServiceAccount,
            _ => SubjectKind::Other(value),
        }
    }
}

impl From<SubjectKind> for String {
    fn from(kind: SubjectKind) -> Self {
        match kind {
            SubjectKind::User => "User".to_string(),
            SubjectKind::Group => "Group".to_string(),
            SubjectKind::ServiceAccount => "ServiceAccount".to_string(),
            SubjectKind::Other(value) => value,
        }
    }
}

/// Kind of the policy object a binding references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleRefKind {
    Role,
    ClusterRole,
    Other(String),
}

impl From<String> for RoleRefKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Role" => RoleRefKind::Role,
            "ClusterRole" => RoleRefKind::ClusterRole,
            _ => RoleRefKind::Other(value),
        }
    }
}

impl From<RoleRefKind> for String {
    fn from(kind: RoleRefKind) -> Self {
        match kind {
            RoleRefKind::Role => "Role".to_string(),
            RoleRefKind::ClusterRole => "ClusterRole".to_string(),
            RoleRefKind::Other(value) => value,
        }
    }
}

/// An identity referenced by a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
    /// Set for ServiceAccount subjects only; empty/absent inherits the
    /// binding's namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
}

/// Reference from a binding to a Role or ClusterRole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    #[serde(default)]
    pub api_group: String,
    pub kind: RoleRefKind,
    pub name: String,
}

/// One RBAC rule inside a Role or ClusterRole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyRule {
    pub verbs: Vec<String>,
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub resource_names: Vec<String>,
    #[serde(rename = "nonResourceURLs")]
    pub non_resource_urls: Vec<String>,
}

/// Namespace-scoped policy object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub metadata: ObjectMeta,
    pub rules: Vec<PolicyRule>,
}

/// Cluster-scoped policy object.
///
/// `aggregation_rule` is carried opaquely for inventory purposes; this
/// connector never resolves it into concrete rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterRole {
    pub metadata: ObjectMeta,
    pub rules: Vec<PolicyRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_rule: Option<Value>,
}

/// Attaches subjects to a Role (or a ClusterRole) within one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}

/// Attaches subjects to a ClusterRole cluster-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    pub role_ref: RoleRef,
}
