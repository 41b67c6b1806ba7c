//! Fetch command - download a GitHub archive into a directory.

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use std::path::PathBuf;

use clever_pm::{Config, InstallationManager, Package};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Repository as owner/name, optionally pinned with @ref
    #[arg(value_name = "OWNER/NAME[@REF]")]
    pub repository: String,

    /// Directory to extract into (replaced if it exists)
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Download from this URL instead of the default branch tarball
    #[arg(long)]
    pub url: Option<String>,
}

pub async fn execute(args: FetchArgs) -> Result<i32> {
    let package = parse_repository(&args.repository)?;

    let config = Config::build(true)?;
    let manager = InstallationManager::new(config);

    let url = manager.fetcher().resolve_url(&package, args.url.as_deref())?;
    println!("{} Downloading {}", style("Info:").cyan(), url);

    manager
        .fetcher()
        .fetch(&package, args.url.as_deref(), &args.dest)
        .await
        .with_context(|| format!("Failed to fetch {}", args.repository))?;

    println!(
        "{} Extracted {} into {}",
        style("Success:").green().bold(),
        package.base_name(),
        args.dest.display()
    );
    Ok(0)
}

/// Turn `owner/name[@ref]` into a package
fn parse_repository(repository: &str) -> Result<Package> {
    let Some((owner, name)) = repository.split_once('/') else {
        bail!("Expected owner/name, got {}", repository);
    };
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        bail!("Expected owner/name, got {}", repository);
    }

    Ok(Package::new(name, "*").with_owner(owner))
}
