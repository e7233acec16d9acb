//! Request-scoped authentication state.
//!
//! The surrounding pipeline creates one `AuthnState` per authentication
//! request, hands each processing filter exclusive mutable access, and passes
//! the state further down the chain. Filters narrow or remove attribute
//! entries in place; they never create or destroy the state itself.

use std::collections::HashMap;

use serde::Deserialize;

use crate::allowlist::AllowList;

/// Attribute bag: attribute name to ordered values.
pub type AttributeMap = HashMap<String, Vec<String>>;

/// Metadata for one federation endpoint (relying party or identity source).
///
/// Hosts carry many more metadata keys; only the two contractual ones are
/// modeled here. An absent `attributes` list means "no limit placed by this
/// endpoint" — distinct from an empty list, which denies everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndpointMetadata {
    /// Stable endpoint identifier.
    #[serde(default, rename = "entityid")]
    pub entity_id: Option<String>,
    /// Endpoint-scoped release allow-list.
    #[serde(default)]
    pub attributes: Option<AllowList>,
}

/// Mutable per-request state consumed by processing filters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthnState {
    /// Attributes collected for release.
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Relying-party (destination) metadata.
    #[serde(default)]
    pub destination: EndpointMetadata,
    /// Identity-source metadata.
    #[serde(default)]
    pub source: EndpointMetadata,
}
