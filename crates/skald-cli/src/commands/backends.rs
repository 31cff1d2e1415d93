//! Backends command implementation.

use std::fs;

use anyhow::Result;
use console::style;
use skald_codegen::TranslationRegistry;
use skald_compile::PassRegistry;
use skald_hal::TransportRegistry;
use skald_platform::{PlatformConfig, TargetDescriptor, descriptor::DESCRIPTOR_EXTENSION};

/// Execute the backends command.
pub fn execute(config: &PlatformConfig) -> Result<()> {
    let transports = TransportRegistry::with_builtins();
    println!("{} Transports:\n", style("Skald").cyan().bold());
    for name in transports.available() {
        let descriptor = TargetDescriptor::load(&config.platform_dir, &name).ok();
        println!(
            "  {} {}",
            if descriptor.is_some() {
                style("●").green()
            } else {
                style("○").yellow()
            },
            style(&name).bold()
        );
        match descriptor {
            Some(d) => {
                println!("    Pipeline: {}", d.pipeline);
                println!(
                    "    Target:   {}",
                    d.codegen_target.as_deref().unwrap_or("(none)")
                );
            }
            None => println!(
                "    No descriptor at {}",
                TargetDescriptor::path(&config.platform_dir, &name).display()
            ),
        }
    }

    println!("\n  Platform directory: {}", config.platform_dir.display());
    if let Ok(entries) = fs::read_dir(&config.platform_dir) {
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == DESCRIPTOR_EXTENSION))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|n| !transports.has_transport(n))
            .collect();
        names.sort();
        for name in names {
            println!(
                "  {} {} (descriptor only, no transport)",
                style("○").dim(),
                style(name).dim()
            );
        }
    }

    println!("\n  Stages:      {}", PassRegistry::with_builtins().available().join(", "));
    println!(
        "  Translators: {}",
        TranslationRegistry::with_builtins(config.codegen_options())
            .available()
            .join(", ")
    );

    Ok(())
}
