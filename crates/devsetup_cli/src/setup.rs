//! The setup run behind the command line.

use anyhow::{Context, Result};
use tracing::info;

use devsetup_core::{run_setup, AutoAccept, ConflictResolver, SetupLayout};

use crate::cli::Cli;
use crate::prompt::ConsolePrompt;

pub fn execute(cli: Cli) -> Result<()> {
    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine the current directory")?,
    };

    let mut layout = SetupLayout::for_project(&project_root);
    if let Some(dir) = &cli.template_dir {
        layout = layout.template_dir(dir);
    }
    if let Some(dir) = &cli.output_dir {
        layout = layout.output_root(dir);
    }

    let request = cli.request();
    info!("Package Name: {}", request.package_name);
    info!(
        "Environment: {}",
        request
            .environment
            .map(|env| env.to_string())
            .unwrap_or_else(|| "(inferred)".to_string())
    );
    info!("desktop_lite Enabled: {}", request.desktop_lite);
    info!("All yes: {}", cli.yes);

    let mut decide: Box<dyn ConflictResolver> = if cli.yes {
        Box::new(AutoAccept)
    } else {
        Box::new(ConsolePrompt::stdio())
    };

    let outcome = run_setup(&layout, &request, decide.as_mut())
        .with_context(|| format!("Setup failed for project {:?}", project_root))?;

    if cli.show_config {
        print!("{}", outcome.resolution.context.to_yaml_string()?);
        return Ok(());
    }

    if !cli.quiet {
        let package_name = outcome
            .resolution
            .context
            .get("package_name")
            .map(|v| v.to_string())
            .unwrap_or_default();
        println!("✅ Development environment rendered for '{}'", package_name);
        println!();
        println!("Environment: {}", outcome.resolution.environment);
        println!("Rendered:    {} files", outcome.report.rendered.len());
        println!("Copied:      {} files", outcome.report.copied.len());
        if outcome.resolution.override_written {
            println!("Config:      {:?} (updated)", layout.override_file);
        } else {
            println!("Config:      {:?}", layout.override_file);
        }
    }

    Ok(())
}
