//! Entitlement definitions attached to inventory objects

use serde::{Deserialize, Serialize};

use super::resource::{Resource, ResourceId, ResourceType};

/// Whether an entitlement assigns membership or grants a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPurpose {
    Assignment,
    Permission,
}

/// One entitlement slot on a resource (a verb, `member`, `impersonate`, ...).
///
/// The full id is `"<type>:<object>:<slug>"`; grants reference the slug only,
/// paired with the target resource id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: String,
    pub resource: ResourceId,
    pub slug: String,
    pub purpose: EntitlementPurpose,
    pub display_name: String,
    pub description: String,
    pub grantable_to: Vec<ResourceType>,
}

impl Entitlement {
    /// An assignment entitlement (membership-style).
    pub fn assignment(
        resource: &Resource,
        slug: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        grantable_to: &[ResourceType],
    ) -> Self {
        Self::build(
            resource,
            slug,
            EntitlementPurpose::Assignment,
            display_name,
            description,
            grantable_to,
        )
    }

    /// A permission entitlement (verb-style).
    pub fn permission(
        resource: &Resource,
        slug: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        grantable_to: &[ResourceType],
    ) -> Self {
        Self::build(
            resource,
            slug,
            EntitlementPurpose::Permission,
            display_name,
            description,
            grantable_to,
        )
    }

    fn build(
        resource: &Resource,
        slug: impl Into<String>,
        purpose: EntitlementPurpose,
        display_name: impl Into<String>,
        description: impl Into<String>,
        grantable_to: &[ResourceType],
    ) -> Self {
        let slug = slug.into();
        Self {
            id: format!(
                "{}:{}:{}",
                resource.id.resource_type.id(),
                resource.id.resource,
                slug
            ),
            resource: resource.id.clone(),
            slug,
            purpose,
            display_name: display_name.into(),
            description: description.into(),
            grantable_to: grantable_to.to_vec(),
        }
    }
}
