//! Grant edges of the compiled authorization graph

use serde::{Deserialize, Serialize};

use super::resource::ResourceId;

/// One edge in the authorization graph.
///
/// `principal` is the holder side, `target` is the object the entitlement
/// applies to, and `entitlement` is the slug (`member`, a verb, ...).
/// Membership edges hold `member` on a role; permission edges are held by
/// the role itself, so the consumer composes subject → role → target paths
/// without this crate materializing the cross product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub entitlement: String,
    pub principal: ResourceId,
    pub target: ResourceId,
}

impl Grant {
    pub fn new(target: ResourceId, entitlement: impl Into<String>, principal: ResourceId) -> Self {
        Self {
            entitlement: entitlement.into(),
            principal,
            target,
        }
    }
}
