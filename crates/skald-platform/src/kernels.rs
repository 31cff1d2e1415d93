//! Kernel IR lookup.

use rustc_hash::FxHashMap;
use skald_ir::{IrResult, Module};
use tracing::debug;

/// Maps kernel names to their serialized IR modules.
#[derive(Debug, Clone, Default)]
pub struct KernelRegistry {
    kernels: FxHashMap<String, String>,
}

impl KernelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register IR text for `name`, replacing any earlier entry.
    pub fn register(&mut self, name: impl Into<String>, ir: impl Into<String>) {
        let name = name.into();
        debug!(kernel = %name, "registering kernel");
        self.kernels.insert(name, ir.into());
    }

    /// Register every function in `module` under its own name.
    pub fn register_module(&mut self, module: &Module) -> IrResult<()> {
        let text = module.to_text()?;
        for function in module.functions() {
            self.register(function.name.clone(), text.clone());
        }
        Ok(())
    }

    /// IR text registered for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.kernels.get(name).map(String::as_str)
    }

    /// Registered kernel names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.kernels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered kernels.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_ir::{Function, QubitId};

    #[test]
    fn test_register_module() {
        let mut a = Function::new("a", 1, 0);
        a.h(QubitId(0)).unwrap();
        let mut module = Module::new("m");
        module.push_function(a).unwrap();
        module.push_function(Function::new("b", 1, 0)).unwrap();

        let mut kernels = KernelRegistry::new();
        kernels.register_module(&module).unwrap();
        assert_eq!(kernels.names(), ["a", "b"]);
        let parsed = Module::from_text(kernels.get("a").unwrap()).unwrap();
        assert_eq!(parsed, module);
        assert!(kernels.get("c").is_none());
    }
}
