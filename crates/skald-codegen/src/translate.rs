//! Name-keyed registry of code-generation targets.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use skald_ir::Module;

use crate::error::{CodegenError, CodegenResult};
use crate::intrinsics::CodegenOptions;
use crate::{qasm2, qir};

/// Target id of the JSON IR dump.
pub const IR_JSON_TARGET: &str = "ir-json";

/// Translator function type.
type Translator = Box<dyn Fn(&Module, &CodegenOptions) -> CodegenResult<String> + Send + Sync>;

/// Maps target ids to translators.
pub struct TranslationRegistry {
    translators: FxHashMap<String, Translator>,
    options: CodegenOptions,
}

impl TranslationRegistry {
    /// Create a new empty registry.
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            translators: FxHashMap::default(),
            options,
        }
    }

    /// Create a registry holding the built-in targets.
    pub fn with_builtins(options: CodegenOptions) -> Self {
        let mut registry = Self::new(options);
        registry.register(qasm2::TARGET, |module, _| qasm2::emit_qasm2(module));
        registry.register(qir::TARGET, qir::emit_qir_base);
        registry.register(IR_JSON_TARGET, |module, _| Ok(module.to_text()?));
        registry
    }

    /// Register a translator; replaces any earlier one for that target.
    pub fn register(
        &mut self,
        target: impl Into<String>,
        translator: impl Fn(&Module, &CodegenOptions) -> CodegenResult<String> + Send + Sync + 'static,
    ) {
        let target = target.into();
        debug!("Registering translator: {}", target);
        self.translators.insert(target, Box::new(translator));
    }

    /// Translate `module` for `target`.
    #[instrument(skip(self, module), fields(module = %module.name))]
    pub fn translate(&self, target: &str, module: &Module) -> CodegenResult<String> {
        let translator = self
            .translators
            .get(target)
            .ok_or_else(|| CodegenError::UnknownTarget(target.to_string()))?;
        translator(module, &self.options)
    }

    /// Options handed to every translator.
    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Registered target ids, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.translators.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a target is registered.
    pub fn has_target(&self, target: &str) -> bool {
        self.translators.contains_key(target)
    }
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::with_builtins(CodegenOptions::default())
    }
}
