mod config;
mod fetch;
mod install;
mod locate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "clever")]
#[command(about = "Install frontend and backend modules into a project")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install packages into the frontend or backend location
    Install(install::InstallArgs),

    /// Find an installed module and check the requested version against it
    Locate(locate::LocateArgs),

    /// Download a GitHub archive into a directory
    Fetch(fetch::FetchArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create async runtime: {}", e))?;

    match cli.command {
        Commands::Install(args) => rt.block_on(install::execute(args)),
        Commands::Locate(args) => rt.block_on(locate::execute(args)),
        Commands::Fetch(args) => rt.block_on(fetch::execute(args)),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

/// Print a fatal engine error the way every command reports it
pub(crate) fn report_fatal(err: &clever_pm::CleverError) -> i32 {
    eprintln!("{} {}", console::style("Error:").red().bold(), err);
    1
}
