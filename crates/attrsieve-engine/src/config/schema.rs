use serde::Deserialize;

use attrsieve_core::error::{AttrSieveError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub version: u32,

    #[serde(default)]
    pub pipeline: Vec<FilterSpec>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AttrSieveError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.pipeline.is_empty() {
            return Err(AttrSieveError::Config("pipeline must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    /// Registered filter name (see `pipeline::FilterRegistry`).
    pub filter: String,

    /// Untyped options handed to the filter factory.
    #[serde(default)]
    pub options: serde_yaml::Value,
}
