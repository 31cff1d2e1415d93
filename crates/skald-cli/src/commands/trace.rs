//! Trace command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use skald_runtime::{InstructionComposer, TraceState, interpret};

use super::common::{load_kernels, parse_args};

/// Execute the trace command.
pub fn execute(input: &Path, kernel: &str, args: &[String], outcome: usize) -> Result<()> {
    let (module, _) = load_kernels(input)?;
    let function = module
        .lookup_function(kernel)
        .ok_or_else(|| anyhow::anyhow!("Kernel '{kernel}' not found in {}", input.display()))?;
    let args = parse_args(args)?;

    let mut composer = InstructionComposer::new(TraceState::new().with_outcome(outcome));
    let interpretation = interpret(function, &args, &mut composer)?;

    for line in composer.state().log() {
        println!("  {line}");
    }
    println!(
        "\n{} Measured: {}",
        style("✓").green().bold(),
        style(interpretation.bitstring()).cyan()
    );
    if interpretation.leaked {
        println!("  {}", style("qudits were still allocated at teardown").yellow());
    }

    Ok(())
}
