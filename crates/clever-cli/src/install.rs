//! Install command - install packages into a configured location.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clever_pm::{Config, InstallationManager, ModuleType, Package};

use crate::config::{CleverToml, CONFIG_FILE};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// JSON file holding an array of packages
    #[arg(value_name = "PACKAGES")]
    pub packages: PathBuf,

    /// Location to install into
    #[arg(long, value_parser = ["frontend", "backend"])]
    pub location: String,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Working directory
    #[arg(short = 'd', long, default_value = ".")]
    pub working_dir: PathBuf,
}

pub async fn execute(args: InstallArgs) -> Result<i32> {
    let module_type: ModuleType = args.location.parse()?;

    let project = CleverToml::load(&args.working_dir)?
        .with_context(|| format!("No {} found in {} or above", CONFIG_FILE, args.working_dir.display()))?;
    let location = project
        .location(module_type)?
        .with_context(|| format!("No [{}] location configured in {}", module_type, CONFIG_FILE))?;

    let packages = read_packages(&args.packages)?;
    if packages.is_empty() {
        println!("{} Nothing to install", style("Info:").cyan());
        return Ok(0);
    }

    let config = Config::build(true)?;
    let manager = InstallationManager::new(config);

    let spinner = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };
    spinner.set_message(format!(
        "Installing {} {} package(s) into {}...",
        packages.len(),
        module_type,
        location.modules_root().display()
    ));

    let result = manager.install(&location, &packages).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            for package in &packages {
                println!("  {} {}", style("+").green(), style(package.base_name()).white().bold());
            }
            println!("{} Installed {} package(s)", style("Success:").green().bold(), packages.len());
            Ok(0)
        }
        Err(e) if e.is_fatal() => Ok(crate::report_fatal(&e)),
        Err(e) => Err(e).context("Installation failed"),
    }
}

/// Read a JSON array of packages
fn read_packages(path: &Path) -> Result<Vec<Package>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
