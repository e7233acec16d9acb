//! Attribute-release policy runtime.
//!
//! Compiled once from untyped options, then shared via Arc. Each `apply`
//! call borrows one request state exclusively and narrows or removes
//! attribute entries in place.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use attrsieve_core::allowlist::AllowList;
use attrsieve_core::error::{AttrSieveError, Result};
use attrsieve_core::state::{AuthnState, EndpointMetadata};

use super::allowlist::{
    bilateral_attribute_allows, bilateral_sp_allows, compile_bare, compile_bilateral,
    compile_constrained, intersect_values,
};

/// Compiled attribute-release policy.
#[derive(Debug, Default)]
pub struct AttributeReleasePolicy {
    /// When true, request-scoped metadata allow-lists take precedence over
    /// the static list.
    use_request_scoped: bool,
    /// Main allow-list, in configuration order.
    static_allow: AllowList,
    /// Relying-party id -> attributes always released to it.
    bilateral_by_sp: HashMap<String, Vec<String>>,
    /// Attribute name -> relying parties always allowed to receive it.
    bilateral_by_attribute: HashMap<String, Vec<String>>,
}

impl AttributeReleasePolicy {
    /// Compile a policy from the host's untyped options mapping.
    pub fn from_options(options: &Mapping) -> Result<Self> {
        let mut policy = Self::default();

        for (key, value) in options {
            match key {
                Value::String(opt) if opt == "default" => {
                    policy.use_request_scoped = option_truthy(opt, value)?;
                }
                Value::String(opt) if opt == "bilateralSPs" => {
                    policy.bilateral_by_sp = compile_bilateral(opt, value)?;
                }
                Value::String(opt) if opt == "bilateralAttributes" => {
                    policy.bilateral_by_attribute = compile_bilateral(opt, value)?;
                }
                Value::String(name) => {
                    policy.static_allow.push(compile_constrained(name, value)?);
                }
                Value::Number(index) if index.is_u64() || index.is_i64() => {
                    policy.static_allow.push(compile_bare(index, value)?);
                }
                other => {
                    return Err(AttrSieveError::Config(format!(
                        "invalid option key: {other:?}"
                    )));
                }
            }
        }

        tracing::debug!(
            allowed = ?policy.static_allow.names().collect::<Vec<_>>(),
            "compiled release allow-list"
        );
        Ok(policy)
    }

    /// Apply the policy to one request, narrowing or removing attributes in
    /// place. The only path that leaves the bag untouched is "no restriction
    /// configured anywhere".
    pub fn apply(&self, state: &mut AuthnState) -> Result<()> {
        let AuthnState {
            attributes,
            destination,
            source,
        } = state;

        let effective = if self.use_request_scoped {
            request_scoped_allow_list(destination, source).unwrap_or(&self.static_allow)
        } else if !self.static_allow.is_empty() {
            &self.static_allow
        } else {
            match request_scoped_allow_list(destination, source) {
                Some(list) => list,
                None => {
                    tracing::debug!("no release restriction configured; passing through");
                    return Ok(());
                }
            }
        };

        // Consulted only when a bilateral table is configured; the id must
        // exist in that case.
        let entity_id = if self.bilateral_by_sp.is_empty() && self.bilateral_by_attribute.is_empty()
        {
            None
        } else {
            Some(destination.entity_id.as_deref().ok_or_else(|| {
                AttrSieveError::MissingEntityId(
                    "bilateral overrides configured but destination metadata has no entityid"
                        .into(),
                )
            })?)
        };

        tracing::debug!(before = ?attributes, "attributes before release filter");

        let names: Vec<String> = attributes.keys().cloned().collect();
        for name in names {
            tracing::debug!(attribute = %name, "release check");

            if effective.permits_any_value(&name) {
                continue;
            }

            if let Some(permitted) = effective.value_constraint(&name) {
                let narrowed = match attributes.get(&name) {
                    Some(current) => intersect_values(permitted, current),
                    None => Vec::new(),
                };
                let kept = !narrowed.is_empty();
                // Narrowing is applied even when the result is empty: a
                // bilateral rescue below keeps the attribute as-is.
                attributes.insert(name.clone(), narrowed);
                if kept {
                    tracing::debug!(attribute = %name, "released with narrowed values");
                    continue;
                }
            }

            if let Some(entity_id) = entity_id {
                if bilateral_sp_allows(&self.bilateral_by_sp, entity_id, &name) {
                    tracing::debug!(
                        attribute = %name,
                        relying_party = %entity_id,
                        "released by relying-party override"
                    );
                    continue;
                }
                if bilateral_attribute_allows(&self.bilateral_by_attribute, &name, entity_id) {
                    tracing::debug!(
                        attribute = %name,
                        relying_party = %entity_id,
                        "released by attribute override"
                    );
                    continue;
                }
            }

            tracing::debug!(attribute = %name, "dropped by release policy");
            attributes.remove(&name);
        }

        tracing::debug!(after = ?attributes, "attributes after release filter");
        Ok(())
    }
}

/// Request-scoped allow-list: destination (relying-party) metadata wins,
/// then source (identity-provider) metadata. `None` means no limit — distinct
/// from an empty list, which denies everything.
fn request_scoped_allow_list<'a>(
    destination: &'a EndpointMetadata,
    source: &'a EndpointMetadata,
) -> Option<&'a AllowList> {
    if let Some(list) = destination.attributes.as_ref() {
        tracing::debug!(
            allowed = ?list.names().collect::<Vec<_>>(),
            "using destination metadata allow-list"
        );
        return Some(list);
    }
    tracing::debug!("destination metadata: no allow-list");

    if let Some(list) = source.attributes.as_ref() {
        tracing::debug!(
            allowed = ?list.names().collect::<Vec<_>>(),
            "using source metadata allow-list"
        );
        return Some(list);
    }
    tracing::debug!("source metadata: no allow-list");

    None
}

/// Source-dialect truthiness for the `default` option scalar.
fn option_truthy(option: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_f64().map_or(true, |f| f != 0.0)),
        Value::String(s) => Ok(!s.is_empty() && s != "0"),
        other => Err(AttrSieveError::Config(format!(
            "option {option} must be a boolean: {other:?}"
        ))),
    }
}
