//! Launch command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use skald_platform::{PlatformConfig, RemoteQpu};

use super::common::{build_context, load_kernels, optional_args, print_results};

/// Execute the launch command.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config: &PlatformConfig,
    input: &Path,
    kernel: &str,
    backend: &str,
    args: &[String],
    shots: Option<u32>,
    observe: Option<&str>,
    asynchronous: bool,
    json: bool,
) -> Result<()> {
    let (_, kernels) = load_kernels(input)?;
    let args = optional_args(args)?;

    let mut qpu = RemoteQpu::new(config.clone(), kernels);
    qpu.set_target_backend(backend)?;

    let mut context = build_context(observe)?;
    if let Some(shots) = shots {
        context = context.with_shots(shots);
    }
    if asynchronous {
        context = context.asynchronous();
    }
    qpu.set_execution_context(context);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Launching {kernel} on {backend}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let launched = qpu.launch_kernel(kernel, args.as_ref()).await;
    let mut context = qpu
        .reset_execution_context()
        .ok_or_else(|| anyhow::anyhow!("Execution context was lost during launch"))?;
    if let Err(e) = launched {
        spinner.finish_and_clear();
        return Err(e.into());
    }

    if let Some(handle) = context.take_pending() {
        spinner.set_message(format!("Waiting for job {}...", handle.id()));
        let results = handle.wait().await?;
        context.set_result(results);
    }
    spinner.finish_and_clear();

    let results = context
        .result()
        .ok_or_else(|| anyhow::anyhow!("Launch produced no results"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_results(results);
    }
    if let Some(energy) = context.expectation() {
        println!("\n  Expectation: {}", style(format!("{energy:.6}")).yellow());
    }

    Ok(())
}
