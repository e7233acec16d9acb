//! Pipeline config loader (strict parsing).

pub mod schema;

use std::fs;

use attrsieve_core::error::{AttrSieveError, Result};

pub use schema::{FilterSpec, PipelineConfig};

pub fn load_from_file(path: &str) -> Result<PipelineConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AttrSieveError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PipelineConfig> {
    let cfg: PipelineConfig = serde_yaml::from_str(s)
        .map_err(|e| AttrSieveError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
