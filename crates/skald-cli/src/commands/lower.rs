//! Lower command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use skald_platform::{PlatformConfig, RemoteQpu};

use super::common::{artifact_file_name, build_context, load_kernels, optional_args};

/// Execute the lower command.
pub fn execute(
    config: &PlatformConfig,
    input: &Path,
    kernel: &str,
    backend: &str,
    args: &[String],
    observe: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    eprintln!(
        "{} Lowering {} for {}",
        style("→").cyan().bold(),
        style(kernel).green(),
        style(backend).yellow()
    );

    let (_, kernels) = load_kernels(input)?;
    let args = optional_args(args)?;

    let mut qpu = RemoteQpu::new(config.clone(), kernels);
    qpu.set_target_backend(backend)?;
    if observe.is_some() {
        qpu.set_execution_context(build_context(observe)?);
    }

    let target = qpu
        .descriptor()
        .and_then(|d| d.codegen_target.clone())
        .unwrap_or_default();
    if let Some(descriptor) = qpu.descriptor() {
        eprintln!("  Pipeline: {}", descriptor.pipeline);
        eprintln!("  Target:   {target}");
    }

    let artifacts = qpu.lower_kernel(kernel, args.as_ref())?;
    eprintln!(
        "{} {} artifact(s)",
        style("✓").green().bold(),
        artifacts.len()
    );

    match output {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            for artifact in &artifacts {
                let path = dir.join(artifact_file_name(&artifact.label, &target));
                fs::write(&path, &artifact.code)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                eprintln!("  Output: {}", style(path.display()).green());
            }
        }
        None => {
            for artifact in &artifacts {
                println!("// ---- {} ----", artifact.label);
                println!("{}", artifact.code);
            }
        }
    }

    Ok(())
}
