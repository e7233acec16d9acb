//! Allow-list compilation and matching utilities.
//!
//! Release-policy options arrive as an untyped mapping in the source dialect:
//! integer-indexed entries are bare attribute names, string-keyed entries are
//! value constraints, and the two bilateral options carry `key -> [values]`
//! tables. Everything is compiled into typed structures here; filter-time
//! code only does lookups.

use std::collections::HashMap;

use serde_yaml::{Number, Value};

use attrsieve_core::allowlist::AllowEntry;
use attrsieve_core::error::{AttrSieveError, Result};

/// Compile a bare allow-list entry (`<index> => name`).
pub fn compile_bare(index: &Number, value: &Value) -> Result<AllowEntry> {
    match value {
        Value::String(name) => Ok(AllowEntry::Unconstrained(name.clone())),
        other => Err(AttrSieveError::Config(format!(
            "invalid attribute name at index {index}: {other:?}"
        ))),
    }
}

/// Compile a value-constrained entry (`name => permitted values`).
pub fn compile_constrained(name: &str, value: &Value) -> Result<AllowEntry> {
    match string_seq(value) {
        Some(values) => Ok(AllowEntry::ValueConstrained(name.to_string(), values)),
        None => Err(AttrSieveError::Config(format!(
            "values for {name} must be specified in a list"
        ))),
    }
}

/// Compile a bilateral override table (`relying-party -> [attributes]` or
/// `attribute -> [relying-parties]`).
pub fn compile_bilateral(option: &str, value: &Value) -> Result<HashMap<String, Vec<String>>> {
    let mapping = match value {
        Value::Mapping(m) => m,
        other => {
            return Err(AttrSieveError::Config(format!(
                "option {option} must be specified as a mapping: {other:?}"
            )))
        }
    };

    let mut out = HashMap::with_capacity(mapping.len());
    for (key, entry) in mapping {
        let key = match key {
            Value::String(s) => s.clone(),
            other => {
                return Err(AttrSieveError::Config(format!(
                    "keys of option {option} must be strings: {other:?}"
                )))
            }
        };
        match string_seq(entry) {
            Some(values) => {
                out.insert(key, values);
            }
            None => {
                return Err(AttrSieveError::Config(format!(
                    "entry {key} of option {option} must be specified in a list"
                )))
            }
        }
    }
    Ok(out)
}

/// Ordered, duplicate-free intersection of permitted and current values.
/// The permitted list's relative order is preserved.
pub fn intersect_values(permitted: &[String], current: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for v in permitted {
        if current.contains(v) && !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

pub fn bilateral_sp_allows(
    table: &HashMap<String, Vec<String>>,
    entity_id: &str,
    name: &str,
) -> bool {
    table
        .get(entity_id)
        .map_or(false, |attrs| attrs.iter().any(|a| a == name))
}

pub fn bilateral_attribute_allows(
    table: &HashMap<String, Vec<String>>,
    name: &str,
    entity_id: &str,
) -> bool {
    table
        .get(name)
        .map_or(false, |sps| sps.iter().any(|sp| sp == entity_id))
}

fn string_seq(value: &Value) -> Option<Vec<String>> {
    let seq = value.as_sequence()?;
    let mut out = Vec::with_capacity(seq.len());
    for v in seq {
        out.push(v.as_str()?.to_string());
    }
    Some(out)
}
