//! Processing-chain registry and ordering tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use attrsieve_core::error::{AttrSieveError, Result};
use attrsieve_core::state::AuthnState;
use attrsieve_engine::config;
use attrsieve_engine::pipeline::{
    AuthProcFilter, FilterFactory, FilterRegistry, ProcessingChain, ATTRIBUTE_RELEASE_FILTER,
};

/// Test filter that appends its own name to a `trail` attribute.
struct MarkFilter {
    name: &'static str,
}

impl AuthProcFilter for MarkFilter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn process(&self, state: &mut AuthnState) -> Result<()> {
        state
            .attributes
            .entry("trail".to_string())
            .or_default()
            .push(self.name.to_string());
        Ok(())
    }
}

struct MarkFactory {
    name: &'static str,
}

impl FilterFactory for MarkFactory {
    fn name(&self) -> &'static str {
        self.name
    }

    fn build(&self, _options: &serde_yaml::Value) -> Result<Arc<dyn AuthProcFilter>> {
        Ok(Arc::new(MarkFilter { name: self.name }))
    }
}

/// Test filter that always fails.
struct FailFilter;

impl AuthProcFilter for FailFilter {
    fn name(&self) -> &'static str {
        "fail"
    }

    fn process(&self, _state: &mut AuthnState) -> Result<()> {
        Err(AttrSieveError::Config("boom".into()))
    }
}

struct FailFactory;

impl FilterFactory for FailFactory {
    fn name(&self) -> &'static str {
        "fail"
    }

    fn build(&self, _options: &serde_yaml::Value) -> Result<Arc<dyn AuthProcFilter>> {
        Ok(Arc::new(FailFilter))
    }
}

fn registry() -> FilterRegistry {
    let registry = FilterRegistry::with_builtins();
    registry.register(Arc::new(MarkFactory { name: "mark-a" }));
    registry.register(Arc::new(MarkFactory { name: "mark-b" }));
    registry.register(Arc::new(FailFactory));
    registry
}

#[test]
fn builtins_are_registered() {
    let names = FilterRegistry::with_builtins().registered_names();
    assert!(names.contains(&ATTRIBUTE_RELEASE_FILTER));
}

#[test]
fn filters_run_in_config_order() {
    let cfg = config::load_from_str(
        "version: 1\npipeline:\n  - filter: mark-b\n  - filter: mark-a\n",
    )
    .unwrap();
    let chain = ProcessingChain::from_config(&registry(), &cfg).unwrap();

    let mut state = AuthnState::default();
    chain.run(&mut state).unwrap();

    assert_eq!(
        state.attributes["trail"],
        vec!["mark-b".to_string(), "mark-a".to_string()]
    );
}

#[test]
fn error_stops_the_chain() {
    let cfg = config::load_from_str(
        "version: 1\npipeline:\n  - filter: mark-a\n  - filter: fail\n  - filter: mark-b\n",
    )
    .unwrap();
    let chain = ProcessingChain::from_config(&registry(), &cfg).unwrap();

    let mut state = AuthnState::default();
    let err = chain.run(&mut state).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG_INVALID");
    assert_eq!(state.attributes["trail"], vec!["mark-a".to_string()]);
}
