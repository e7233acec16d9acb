//! Top-level facade crate for attrsieve.
//!
//! Re-exports core types and the engine library so hosts can depend on a single crate.

pub mod core {
    pub use attrsieve_core::*;
}

pub mod engine {
    pub use attrsieve_engine::*;
}
