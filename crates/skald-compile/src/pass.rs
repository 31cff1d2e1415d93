//! The lowering stage trait.

use skald_ir::Module;

use crate::error::CompileResult;

/// A lowering stage that transforms a kernel module in place.
///
/// Stages are the unit of a lowering pipeline. Each one reads and rewrites
/// the module's functions; a failing stage leaves the module in an
/// unspecified state and the pipeline stops.
pub trait Pass: Send + Sync {
    /// Stage name, as used in pipeline strings.
    fn name(&self) -> &str;

    /// Run the stage on `module`.
    fn run(&self, module: &mut Module) -> CompileResult<()>;

    /// Check if this stage has anything to do.
    fn should_run(&self, _module: &Module) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            "test"
        }

        fn run(&self, _module: &mut Module) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_should_run() {
        let pass = TestPass;
        assert_eq!(pass.name(), "test");
        assert!(pass.should_run(&Module::new("m")));
    }
}
