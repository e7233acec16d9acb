//! Allow-list data model.
//!
//! Release allow-lists mix two entry shapes in one ordered structure: a bare
//! attribute name (release all values) and a `name -> permitted values` pair
//! (release the intersection only). Entries are parsed once into tagged
//! variants; nothing re-inspects shapes at filter time.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// One allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowEntry {
    /// Attribute released with all of its values.
    Unconstrained(String),
    /// Attribute released with values narrowed to the permitted set.
    ValueConstrained(String, Vec<String>),
}

impl AllowEntry {
    /// Attribute name this entry covers.
    pub fn name(&self) -> &str {
        match self {
            AllowEntry::Unconstrained(name) => name,
            AllowEntry::ValueConstrained(name, _) => name,
        }
    }
}

impl<'de> Deserialize<'de> for AllowEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = AllowEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(
                    "an attribute name or a single-entry map of name to permitted values",
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(AllowEntry::Unconstrained(v.to_string()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (name, values): (String, Vec<String>) = match map.next_entry()? {
                    Some(entry) => entry,
                    None => return Err(de::Error::invalid_length(0, &self)),
                };
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom(
                        "allow-list map entries must name a single attribute",
                    ));
                }
                Ok(AllowEntry::ValueConstrained(name, values))
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

/// Ordered allow-list, preserving configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<AllowEntry>);

impl AllowList {
    pub fn new(entries: Vec<AllowEntry>) -> Self {
        Self(entries)
    }

    pub fn push(&mut self, entry: AllowEntry) {
        self.0.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[AllowEntry] {
        &self.0
    }

    /// Attribute names covered by this list, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AllowEntry::name)
    }

    /// True when `name` appears as an unconstrained entry.
    pub fn permits_any_value(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|e| matches!(e, AllowEntry::Unconstrained(n) if n == name))
    }

    /// First value constraint registered for `name`, if any.
    pub fn value_constraint(&self, name: &str) -> Option<&[String]> {
        self.0.iter().find_map(|e| match e {
            AllowEntry::ValueConstrained(n, values) if n == name => Some(values.as_slice()),
            _ => None,
        })
    }
}
