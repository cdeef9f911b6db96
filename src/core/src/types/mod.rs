//! Core types of the compiled authorization graph

mod entitlement;
mod grant;
mod resource;

pub use entitlement::{Entitlement, EntitlementPurpose};
pub use grant::Grant;
pub use resource::{Resource, ResourceId, ResourceType};
