//! Policy layer (release allow-lists, bilateral overrides).
//!
//! Compiles release-policy options into lookup structures the per-request
//! filtering pass consumes at runtime.

pub mod allowlist;
pub mod engine;

pub use engine::AttributeReleasePolicy;
