//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum kernel lowering and remote dispatch",
        style("Skald").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  skald-ir        Kernel intermediate representation");
    println!("  skald-compile   Lowering stages and pipelines");
    println!("  skald-codegen   Intrinsics, literals and translators");
    println!("  skald-hal       Transports, jobs and execution contexts");
    println!("  skald-runtime   Local qudit runtime");
    println!("  skald-platform  Remote QPU");
    println!("  skald-cli       Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/skald-quantum/skald").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
