//! Transport registry.
//!
//! The [`TransportRegistry`] maps backend ids to transport constructors so the
//! platform can create one by name when a backend selector is applied.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{HalError, HalResult};
use crate::loopback::LoopbackTransport;
use crate::transport::JobTransport;

/// Factory function type for transports.
type TransportFactory = Box<dyn Fn() -> Box<dyn JobTransport> + Send + Sync>;

/// Central registry of job transports.
pub struct TransportRegistry {
    factories: FxHashMap<String, TransportFactory>,
}

impl TransportRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Create a registry holding the built-in transports.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register::<LoopbackTransport>(LoopbackTransport::NAME);
        registry
    }

    /// Register a transport type constructed with `Default`.
    pub fn register<T>(&mut self, name: impl Into<String>)
    where
        T: JobTransport + Default + 'static,
    {
        self.register_factory(name, || Box::new(T::default()));
    }

    /// Register a transport with a custom constructor.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Box<dyn JobTransport> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering transport: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create an uninitialized transport by name.
    pub fn create(&self, name: &str) -> HalResult<Box<dyn JobTransport>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| {
                HalError::TransportUnavailable(format!(
                    "No transport registered with name '{}'",
                    name
                ))
            })
    }

    /// Names of all registered transports, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a transport is registered.
    pub fn has_transport(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for TransportRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = TransportRegistry::with_builtins();
        assert!(registry.has_transport("loopback"));
        assert_eq!(registry.available(), vec!["loopback".to_string()]);
    }

    #[test]
    fn test_create_unknown() {
        let registry = TransportRegistry::new();
        let err = registry.create("nonexistent").err().unwrap();
        assert!(matches!(err, HalError::TransportUnavailable(_)));
    }

    #[test]
    fn test_register_factory_named() {
        let mut registry = TransportRegistry::new();
        registry.register_factory("alias", || Box::new(LoopbackTransport::default()));
        let transport = registry.create("alias").unwrap();
        assert_eq!(transport.name(), "loopback");
        assert_eq!(registry.available(), vec!["alias".to_string()]);
    }
}
