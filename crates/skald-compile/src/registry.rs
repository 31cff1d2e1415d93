//! Name-keyed registry of lowering stages.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::passes::{Canonicalize, CzGateSetMapping, ExpandControls};

/// Factory function type for stages.
type PassFactory = Box<dyn Fn() -> Box<dyn Pass> + Send + Sync>;

/// Maps stage names to constructors.
///
/// Parameterised stages such as [`ObserveAnsatz`](crate::passes::ObserveAnsatz)
/// are built directly and are not registered here.
pub struct PassRegistry {
    factories: FxHashMap<String, PassFactory>,
}

impl PassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Create a registry holding the built-in stages.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Canonicalize::NAME, || Box::new(Canonicalize));
        registry.register(CzGateSetMapping::NAME, || Box::new(CzGateSetMapping));
        registry.register(ExpandControls::NAME, || Box::new(ExpandControls));
        registry
    }

    /// Register a stage constructor; replaces any earlier one with that name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn Pass> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering stage: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Instantiate a stage by name.
    pub fn create(&self, name: &str) -> CompileResult<Box<dyn Pass>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| CompileError::UnknownPass(name.to_string()))
    }

    /// Registered stage names, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a stage is registered.
    pub fn has_pass(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
