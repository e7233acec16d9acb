//! Synchronous authentication processing chain.
//!
//! Filters are registered by name, built from per-deployment configuration,
//! and run in configuration order against the request state. The chain
//! carries no protocol logic and no I/O; it exists so release filters are
//! exercised the way host pipelines invoke them.

use std::sync::Arc;

use dashmap::DashMap;
use serde_yaml::Value;

use attrsieve_core::error::{AttrSieveError, Result};
use attrsieve_core::state::AuthnState;

use crate::config::PipelineConfig;
use crate::policy::AttributeReleasePolicy;

/// Registered name of the built-in attribute-release filter.
pub const ATTRIBUTE_RELEASE_FILTER: &str = "attribute-release";

/// One link in the processing chain.
pub trait AuthProcFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn process(&self, state: &mut AuthnState) -> Result<()>;
}

/// Builds filters from untyped per-deployment options.
pub trait FilterFactory: Send + Sync {
    fn name(&self) -> &'static str;
    fn build(&self, options: &Value) -> Result<Arc<dyn AuthProcFilter>>;
}

/// Registry of available filter factories.
#[derive(Default)]
pub struct FilterRegistry {
    factories: DashMap<&'static str, Arc<dyn FilterFactory>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Registry with the built-in filters registered.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(AttributeReleaseFactory));
        registry
    }

    pub fn register(&self, factory: Arc<dyn FilterFactory>) {
        self.factories.insert(factory.name(), factory);
    }

    pub fn registered_names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|e| *e.key()).collect()
    }

    fn factory(&self, name: &str) -> Result<Arc<dyn FilterFactory>> {
        self.factories
            .get(name)
            .map(|e| e.value().clone())
            .ok_or_else(|| AttrSieveError::Config(format!("unknown filter: {name}")))
    }
}

/// Ordered filters compiled once from a pipeline config.
/// Construct at startup, then share via Arc.
pub struct ProcessingChain {
    filters: Vec<Arc<dyn AuthProcFilter>>,
}

impl ProcessingChain {
    /// Compile the chain, resolving each spec against the registry.
    pub fn from_config(registry: &FilterRegistry, cfg: &PipelineConfig) -> Result<Self> {
        let mut filters = Vec::with_capacity(cfg.pipeline.len());
        for spec in &cfg.pipeline {
            let factory = registry.factory(&spec.filter)?;
            let filter = factory.build(&spec.options).map_err(|e| {
                AttrSieveError::Config(format!("filter {} build failed: {e}", spec.filter))
            })?;
            filters.push(filter);
        }
        Ok(Self { filters })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter, in order, against one request state.
    /// Stops at the first error.
    pub fn run(&self, state: &mut AuthnState) -> Result<()> {
        for filter in &self.filters {
            tracing::debug!(filter = %filter.name(), "running processing filter");
            filter.process(state)?;
        }
        Ok(())
    }
}

/// Built-in factory for the attribute-release filter.
pub struct AttributeReleaseFactory;

impl FilterFactory for AttributeReleaseFactory {
    fn name(&self) -> &'static str {
        ATTRIBUTE_RELEASE_FILTER
    }

    fn build(&self, options: &Value) -> Result<Arc<dyn AuthProcFilter>> {
        let policy = match options {
            Value::Null => AttributeReleasePolicy::from_options(&serde_yaml::Mapping::new())?,
            Value::Mapping(m) => AttributeReleasePolicy::from_options(m)?,
            other => {
                return Err(AttrSieveError::Config(format!(
                    "attribute-release options must be a mapping: {other:?}"
                )))
            }
        };
        Ok(Arc::new(policy))
    }
}

impl AuthProcFilter for AttributeReleasePolicy {
    fn name(&self) -> &'static str {
        ATTRIBUTE_RELEASE_FILTER
    }

    fn process(&self, state: &mut AuthnState) -> Result<()> {
        self.apply(state)
    }
}
