//! attrsieve engine library entry.
//!
//! This crate wires the config loader, the attribute-release policy, and the
//! synchronous processing chain into a cohesive policy stack. It is intended
//! to be consumed by host authentication pipelines and by integration tests.

pub mod config;
pub mod pipeline;
pub mod policy;
