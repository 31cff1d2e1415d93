//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use skald_compile::KernelArgs;
use skald_hal::{ExecutionContext, ResultSet};
use skald_ir::{Module, Observable};
use skald_platform::KernelRegistry;
use tracing::info;

/// Load a JSON IR module and register each of its functions as a kernel.
pub fn load_kernels(path: &Path) -> Result<(Module, KernelRegistry)> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let module = Module::from_text(&source)
        .with_context(|| format!("Failed to parse kernel module: {}", path.display()))?;

    let mut kernels = KernelRegistry::new();
    kernels.register_module(&module)?;
    info!(path = %path.display(), kernels = kernels.len(), "loaded kernel module");
    Ok((module, kernels))
}

/// Parse `name=value` pairs into kernel arguments.
pub fn parse_args(raw: &[String]) -> Result<KernelArgs> {
    raw.iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("Argument '{pair}' must be name=value"))?;
            let value: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("Argument '{name}' is not a number: '{value}'"))?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}

/// `None` when no arguments were given, so lowering skips synthesis.
pub fn optional_args(raw: &[String]) -> Result<Option<KernelArgs>> {
    if raw.is_empty() {
        Ok(None)
    } else {
        parse_args(raw).map(Some)
    }
}

/// Build the execution context for a sample or observe launch.
pub fn build_context(observe: Option<&str>) -> Result<ExecutionContext> {
    match observe {
        Some(spec) => {
            let observable: Observable = spec
                .parse()
                .with_context(|| format!("Invalid spin operator: '{spec}'"))?;
            Ok(ExecutionContext::observe(observable))
        }
        None => Ok(ExecutionContext::sample()),
    }
}

/// File name for an artifact written by `lower --output`.
pub fn artifact_file_name(label: &str, target: &str) -> String {
    let ext = match target {
        "qasm2" => "qasm",
        "qir-base" => "ll",
        "ir-json" => "json",
        _ => "txt",
    };
    format!("{label}.{ext}")
}

/// Print per-label histograms.
pub fn print_results(results: &ResultSet) {
    for result in results.results() {
        let total = result.counts.total_shots();
        println!(
            "\n{} {} ({} shots):",
            style("✓").green().bold(),
            style(&result.label).bold(),
            total
        );

        for (bitstring, count) in result.counts.iter().take(16) {
            let prob = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            let bar = "█".repeat((prob / 2.0).round() as usize);
            println!(
                "  {}: {:>6} ({:>5.2}%) {}",
                style(bitstring).cyan(),
                count,
                prob,
                style(bar).green()
            );
        }
        if result.counts.len() > 16 {
            println!("  ... and {} more outcomes", result.counts.len() - 16);
        }
    }
}
