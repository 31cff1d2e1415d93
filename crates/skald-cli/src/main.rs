//! Skald Command-Line Interface
//!
//! Lower kernels for a remote backend, launch them, or trace them through
//! the local runtime.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use skald_codegen::DEFAULT_LITERAL_HASH_THRESHOLD;
use skald_platform::PlatformConfig;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{backends, launch, lower, trace, version};

/// Skald - lower and dispatch quantum kernels to remote backends
#[derive(Parser)]
#[command(name = "skald")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding <backend>.config descriptors
    #[arg(long, env = "SKALD_PLATFORM_DIR", global = true)]
    platform_dir: Option<PathBuf>,

    /// Literals longer than this are named by an MD5 digest
    #[arg(
        long,
        env = "SKALD_LENGTH_TO_HASH_STRING_LITERAL",
        default_value_t = DEFAULT_LITERAL_HASH_THRESHOLD,
        global = true
    )]
    length_to_hash_string_literal: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a kernel for a backend and print or save the artifacts
    Lower {
        /// Kernel module (JSON IR)
        #[arg(short, long)]
        input: PathBuf,

        /// Kernel name
        #[arg(short, long)]
        kernel: String,

        /// Backend selector, e.g. "quantinuum;machine;H1-2E"
        #[arg(short, long, default_value = "loopback")]
        backend: String,

        /// Kernel argument as name=value (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Lower for observing this spin operator, e.g. "0.5 ZI + -0.25 XX"
        #[arg(long)]
        observe: Option<String>,

        /// Directory to write one file per artifact
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lower a kernel and execute it on a backend
    Launch {
        /// Kernel module (JSON IR)
        #[arg(short, long)]
        input: PathBuf,

        /// Kernel name
        #[arg(short, long)]
        kernel: String,

        /// Backend selector
        #[arg(short, long, default_value = "loopback")]
        backend: String,

        /// Kernel argument as name=value (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Observe this spin operator instead of sampling
        #[arg(long)]
        observe: Option<String>,

        /// Leave the job pending and wait on the handle afterwards
        #[arg(long = "async")]
        asynchronous: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a kernel through the local runtime and print the instruction trace
    Trace {
        /// Kernel module (JSON IR)
        #[arg(short, long)]
        input: PathBuf,

        /// Kernel name
        #[arg(short, long)]
        kernel: String,

        /// Kernel argument as name=value (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Level every measurement reports
        #[arg(long, default_value = "0")]
        outcome: usize,
    },

    /// List transports, stages, translators and descriptors
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match cli.platform_dir {
        Some(dir) => PlatformConfig::new(dir),
        None => PlatformConfig::from_env(),
    }
    .with_literal_hash_threshold(cli.length_to_hash_string_literal);

    let result = match cli.command {
        Commands::Lower {
            input,
            kernel,
            backend,
            args,
            observe,
            output,
        } => lower::execute(
            &config,
            &input,
            &kernel,
            &backend,
            &args,
            observe.as_deref(),
            output.as_deref(),
        ),

        Commands::Launch {
            input,
            kernel,
            backend,
            args,
            shots,
            observe,
            asynchronous,
            json,
        } => {
            launch::execute(
                &config,
                &input,
                &kernel,
                &backend,
                &args,
                shots,
                observe.as_deref(),
                asynchronous,
                json,
            )
            .await
        }

        Commands::Trace {
            input,
            kernel,
            args,
            outcome,
        } => trace::execute(&input, &kernel, &args, outcome),

        Commands::Backends => backends::execute(&config),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
