//! Pass manager for orchestrating lowering.

use tracing::{debug, info, instrument};

use skald_ir::Module;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::registry::PassRegistry;

/// Runs a sequence of lowering stages in order.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Build a manager from a comma-separated list of stage names.
    ///
    /// Whitespace around names is ignored, as are empty entries.
    pub fn from_pipeline(pipeline: &str, registry: &PassRegistry) -> CompileResult<Self> {
        let mut pm = Self::new();
        for name in pipeline.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            pm.passes.push(registry.create(name)?);
        }
        Ok(pm)
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Add an already boxed pass.
    pub fn add_boxed(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Run all passes on `module`, stopping at the first failure.
    ///
    /// Every failure is reported as [`CompileError::PassFailed`] naming the
    /// stage it came from.
    #[instrument(skip(self, module), fields(module = %module.name))]
    pub fn run(&self, module: &mut Module) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on module with {} functions",
            self.passes.len(),
            module.functions().count()
        );

        for pass in &self.passes {
            if !pass.should_run(module) {
                debug!("Skipping pass: {}", pass.name());
                continue;
            }
            debug!("Running pass: {}", pass.name());
            pass.run(module).map_err(|e| match e {
                CompileError::PassFailed { .. } => e,
                other => CompileError::pass_failed(pass.name(), other.to_string()),
            })?;
            debug!(
                "Pass {} completed, ops: {}",
                pass.name(),
                module.functions().map(|f| f.num_ops()).sum::<usize>()
            );
        }

        Ok(())
    }

    /// Stage names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_ir::{Function, QubitId};

    struct Failing;

    impl Pass for Failing {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn run(&self, _module: &mut Module) -> CompileResult<()> {
            Err(CompileError::ArgumentSynthesis("boom".into()))
        }
    }

    #[test]
    fn test_from_pipeline() {
        let registry = PassRegistry::with_builtins();
        let pm = PassManager::from_pipeline(" canonicalize, ,cz-gate-set-mapping ", &registry).unwrap();
        assert_eq!(pm.names(), ["canonicalize", "cz-gate-set-mapping"]);
    }

    #[test]
    fn test_from_pipeline_unknown_stage() {
        let registry = PassRegistry::with_builtins();
        let err = PassManager::from_pipeline("canonicalize,nope", &registry).err().unwrap();
        assert!(matches!(err, CompileError::UnknownPass(ref n) if n == "nope"));
    }

    #[test]
    fn test_failure_names_stage() {
        let mut pm = PassManager::new();
        pm.add_pass(Failing);
        let mut module = Module::new("m");
        let mut f = Function::new("k", 1, 0);
        f.h(QubitId(0)).unwrap();
        module.push_function(f).unwrap();

        match pm.run(&mut module) {
            Err(CompileError::PassFailed { stage, diagnostic }) => {
                assert_eq!(stage, "always-fails");
                assert!(diagnostic.contains("boom"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_manager() {
        let pm = PassManager::default();
        assert!(pm.is_empty());
        assert!(pm.run(&mut Module::new("m")).is_ok());
    }
}
