//! Locate command - find an installed module across the configured locations.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use clever_pm::{ModuleLocator, VersionCheck};

use crate::config::{CleverToml, CONFIG_FILE};

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Module name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Version about to be installed
    #[arg(long, default_value = "*")]
    pub version: String,

    /// Refuse when the installed version is already greater (gt) or lower (lt)
    #[arg(long, default_value = "gt")]
    pub check: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Working directory
    #[arg(short = 'd', long, default_value = ".")]
    pub working_dir: PathBuf,
}

pub async fn execute(args: LocateArgs) -> Result<i32> {
    let project = CleverToml::load(&args.working_dir)?
        .with_context(|| format!("No {} found in {} or above", CONFIG_FILE, args.working_dir.display()))?;
    let locations = project.locations()?;
    let check = VersionCheck::parse_lenient(&args.check);

    log::debug!(
        "Locating {}@{} ({}) in {} location(s)",
        args.name,
        args.version,
        check,
        locations.len()
    );

    let found = match ModuleLocator::locate(&locations, &args.name, &args.version, check).await {
        Ok(found) => found,
        Err(e) if e.is_fatal() => return Ok(crate::report_fatal(&e)),
        Err(e) => return Err(e).context("Failed to locate module"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(0);
    }

    match found {
        Some(module) => println!(
            "{} {} ({})",
            style("Found").green().bold(),
            style(&module.name).white().bold(),
            module.module_type
        ),
        None => println!("{} {} is not installed", style("Info:").cyan(), args.name),
    }

    Ok(0)
}
