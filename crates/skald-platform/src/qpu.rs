//! The remote QPU: targets a backend, lowers kernels for it and launches
//! them through its transport.

use std::sync::Arc;

use skald_codegen::TranslationRegistry;
use skald_compile::{
    ArgumentSynthesis, Canonicalize, CompileError, KernelArgs, ObserveAnsatz, Pass, PassManager,
    PassRegistry,
};
use skald_hal::{
    BackendConfig, ExecutionContext, ExecutionMode, JobTransport, LoweredArtifact,
    TransportRegistry, dispatch,
};
use skald_ir::Module;
use tracing::{debug, info, instrument};

use crate::config::PlatformConfig;
use crate::descriptor::TargetDescriptor;
use crate::error::{PlatformError, PlatformResult};
use crate::kernels::KernelRegistry;
use crate::selector::BackendSelector;

/// A configured backend.
struct ActiveTarget {
    name: String,
    config: BackendConfig,
    descriptor: TargetDescriptor,
    transport: Arc<dyn JobTransport>,
}

/// A QPU whose kernels execute on a remote service.
///
/// Call [`set_target_backend`](Self::set_target_backend) first, then install
/// an [`ExecutionContext`] and [`launch_kernel`](Self::launch_kernel).
pub struct RemoteQpu {
    config: PlatformConfig,
    kernels: KernelRegistry,
    passes: PassRegistry,
    translations: TranslationRegistry,
    transports: TransportRegistry,
    target: Option<ActiveTarget>,
    shots: Option<u32>,
    context: Option<ExecutionContext>,
}

impl RemoteQpu {
    /// Create a QPU with the built-in stages, translators and transports.
    pub fn new(config: PlatformConfig, kernels: KernelRegistry) -> Self {
        let translations = TranslationRegistry::with_builtins(config.codegen_options());
        Self {
            config,
            kernels,
            passes: PassRegistry::with_builtins(),
            translations,
            transports: TransportRegistry::with_builtins(),
            target: None,
            shots: None,
            context: None,
        }
    }

    /// Replace the transport registry.
    pub fn with_transports(mut self, transports: TransportRegistry) -> Self {
        self.transports = transports;
        self
    }

    /// Replace the stage registry.
    pub fn with_passes(mut self, passes: PassRegistry) -> Self {
        self.passes = passes;
        self
    }

    /// Replace the translator registry.
    pub fn with_translations(mut self, translations: TranslationRegistry) -> Self {
        self.translations = translations;
        self
    }

    /// Always true.
    pub fn is_remote(&self) -> bool {
        true
    }

    /// Always false; results come from a real service.
    pub fn is_simulator(&self) -> bool {
        false
    }

    /// Always false; kernels cannot branch on mid-circuit measurement.
    pub fn supports_conditional_feedback(&self) -> bool {
        false
    }

    /// Platform configuration.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Kernels this QPU can lower.
    pub fn kernels(&self) -> &KernelRegistry {
        &self.kernels
    }

    /// Mutable access to the kernel registry.
    pub fn kernels_mut(&mut self) -> &mut KernelRegistry {
        &mut self.kernels
    }

    /// Id of the targeted backend.
    pub fn target_name(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.name.as_str())
    }

    /// Configuration the targeted backend was initialized with.
    pub fn backend_config(&self) -> Option<&BackendConfig> {
        self.target.as_ref().map(|t| &t.config)
    }

    /// Descriptor of the targeted backend.
    pub fn descriptor(&self) -> Option<&TargetDescriptor> {
        self.target.as_ref().map(|t| &t.descriptor)
    }

    /// Configure the QPU for `selector` (`<id>[;key;value]*`).
    ///
    /// Reads `<platform_dir>/<id>.config`, creates the transport registered
    /// under `<id>` and initializes it with the selector's key/value pairs.
    /// Targeting the backend already in use does nothing.
    #[instrument(skip(self))]
    pub fn set_target_backend(&mut self, selector: &str) -> PlatformResult<()> {
        let selector = BackendSelector::parse(selector)?;
        if self.target_name() == Some(selector.name.as_str()) {
            debug!(backend = %selector.name, "backend already targeted");
            return Ok(());
        }

        let descriptor = TargetDescriptor::load(&self.config.platform_dir, &selector.name)?;
        let mut transport = self.transports.create(&selector.name)?;
        transport.initialize(&selector.config)?;

        info!(
            backend = %selector.name,
            pipeline = %descriptor.pipeline,
            target = descriptor.codegen_target.as_deref().unwrap_or("<none>"),
            "target backend configured"
        );
        self.target = Some(ActiveTarget {
            name: selector.name,
            config: selector.config,
            descriptor,
            transport: Arc::from(transport),
        });
        Ok(())
    }

    /// Shots for subsequent launches when the context sets none.
    pub fn set_shots(&mut self, shots: u32) {
        self.shots = Some(shots);
    }

    /// Forget the shot count set by [`set_shots`](Self::set_shots).
    pub fn clear_shots(&mut self) {
        self.shots = None;
    }

    /// Current QPU-level shot count.
    pub fn shots(&self) -> Option<u32> {
        self.shots
    }

    /// Install the context that launches read from and write into.
    pub fn set_execution_context(&mut self, context: ExecutionContext) {
        debug!(mode = %context.mode(), "setting execution context");
        self.context = Some(context);
    }

    /// Remove and return the installed context.
    pub fn reset_execution_context(&mut self) -> Option<ExecutionContext> {
        self.context.take()
    }

    /// The installed context.
    pub fn execution_context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    /// Mutable access to the installed context.
    pub fn execution_context_mut(&mut self) -> Option<&mut ExecutionContext> {
        self.context.as_mut()
    }

    /// Lower kernel `name` into the artifacts the targeted backend consumes.
    ///
    /// The kernel's function is copied into a fresh module, marked as the
    /// entry point and run through the descriptor's pipeline. With `args`
    /// the arguments are then bound. Under an observe context the result is
    /// one artifact per non-identity term, labeled by its Pauli word;
    /// otherwise a single artifact labeled with the kernel name.
    #[instrument(skip(self, args))]
    pub fn lower_kernel(
        &self,
        name: &str,
        args: Option<&KernelArgs>,
    ) -> PlatformResult<Vec<LoweredArtifact>> {
        let target = self.target.as_ref().ok_or(PlatformError::NoTargetConfigured)?;
        let mut module = self.load_kernel(name)?;

        PassManager::from_pipeline(&target.descriptor.pipeline, &self.passes)
            .and_then(|pm| pm.run(&mut module))
            .map_err(pipeline_error)?;

        if let Some(args) = args {
            ArgumentSynthesis::new(name, args.clone())
                .run(&mut module)
                .map_err(synthesis_error)?;
        }

        let modules = match self.context.as_ref() {
            Some(ctx) if ctx.mode() == ExecutionMode::Observe => {
                let observable = ctx.observable().ok_or_else(|| PlatformError::Pipeline {
                    stage: ObserveAnsatz::NAME.to_string(),
                    diagnostic: "observe context carries no observable".into(),
                })?;
                let mut modules = Vec::new();
                for term in observable.non_identity_terms() {
                    let mut tmp = module.clone();
                    ObserveAnsatz::new(term.symplectic.clone())
                        .run(&mut tmp)
                        .map_err(pipeline_error)?;
                    Canonicalize.run(&mut tmp).map_err(pipeline_error)?;
                    modules.push((term.label(), tmp));
                }
                modules
            }
            _ => vec![(name.to_string(), module)],
        };

        let codegen_target =
            target
                .descriptor
                .codegen_target
                .as_deref()
                .ok_or_else(|| PlatformError::CodeGen {
                    target: String::new(),
                    reason: format!("descriptor for '{}' sets no CODEGEN_EMISSION", target.name),
                })?;

        let artifacts = modules
            .into_iter()
            .map(|(label, module)| {
                self.translations
                    .translate(codegen_target, &module)
                    .map(|code| LoweredArtifact::new(label, code))
                    .map_err(|e| PlatformError::CodeGen {
                        target: codegen_target.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<PlatformResult<Vec<_>>>()?;
        debug!(kernel = name, artifacts = artifacts.len(), "kernel lowered");
        Ok(artifacts)
    }

    /// Lower kernel `name` and execute it on the targeted backend.
    ///
    /// Requires an execution context. Shots come from the context, then from
    /// [`set_shots`](Self::set_shots). A synchronous context receives the
    /// results before this returns; an asynchronous one receives a pending
    /// job handle.
    #[instrument(skip(self, args))]
    pub async fn launch_kernel(&mut self, name: &str, args: Option<&KernelArgs>) -> PlatformResult<()> {
        let Some(ctx) = self.context.as_ref() else {
            return Err(PlatformError::NoActiveExecutionContext);
        };
        let shots = ctx.shots().or(self.shots);

        let artifacts = self.lower_kernel(name, args)?;
        let transport = self
            .target
            .as_ref()
            .map(|t| Arc::clone(&t.transport))
            .ok_or(PlatformError::NoTargetConfigured)?;

        info!(kernel = name, artifacts = artifacts.len(), ?shots, "launching kernel");
        let handle = dispatch(transport, artifacts, shots);

        let ctx = self
            .context
            .as_mut()
            .ok_or(PlatformError::NoActiveExecutionContext)?;
        if ctx.is_asynchronous() {
            debug!(job = %handle.id(), "job left pending on context");
            ctx.set_pending(handle);
        } else {
            let results = handle.wait().await?;
            ctx.set_result(results);
        }
        Ok(())
    }

    fn load_kernel(&self, name: &str) -> PlatformResult<Module> {
        let text = self
            .kernels
            .get(name)
            .ok_or_else(|| PlatformError::KernelNotFound(name.to_string()))?;
        let source = Module::from_text(text).map_err(|e| PlatformError::InvalidKernelIr {
            kernel: name.to_string(),
            reason: e.to_string(),
        })?;
        let mut function = source
            .lookup_function(name)
            .cloned()
            .ok_or_else(|| PlatformError::InvalidKernelIr {
                kernel: name.to_string(),
                reason: "module has no function with the kernel's name".into(),
            })?;
        function.set_entry_point();

        let mut module = Module::new(name);
        module
            .push_function(function)
            .map_err(|e| PlatformError::InvalidKernelIr {
                kernel: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(module)
    }
}

fn pipeline_error(err: CompileError) -> PlatformError {
    match err {
        CompileError::PassFailed { stage, diagnostic } => PlatformError::Pipeline { stage, diagnostic },
        CompileError::UnknownPass(stage) => PlatformError::Pipeline {
            stage,
            diagnostic: "no stage registered under this name".into(),
        },
        CompileError::ArgumentSynthesis(reason) => PlatformError::ArgumentSynthesis(reason),
        other => PlatformError::Pipeline {
            stage: "pipeline".into(),
            diagnostic: other.to_string(),
        },
    }
}

fn synthesis_error(err: CompileError) -> PlatformError {
    match err {
        CompileError::PassFailed { diagnostic, .. } | CompileError::ArgumentSynthesis(diagnostic) => {
            PlatformError::ArgumentSynthesis(diagnostic)
        }
        other => PlatformError::ArgumentSynthesis(other.to_string()),
    }
}
