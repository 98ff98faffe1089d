//! psnav - Entry Point

use clap::Parser;
use psnav::config::CliOverrides;
use psnav::provider::{FixtureProvider, PwshProvider};
use psnav::view::{ColorConfig, RunOutcome, SessionOptions};
use std::path::PathBuf;
use tracing::info;

/// Browse PowerShell modules, their commands and help in the terminal
#[derive(Parser, Debug)]
#[command(name = "psnav")]
#[command(version)]
#[command(about = "Terminal navigator for PowerShell modules, commands and their help")]
pub struct Args {
    /// Only list modules whose name matches this filter
    pub filter: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// PowerShell executable to query
    #[arg(long)]
    pub shell: Option<String>,

    /// Serve modules from a JSON catalog file instead of PowerShell
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Collapse module families (names sharing a prefix before '.')
    #[arg(long)]
    pub group: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            shell: self.shell.clone(),
            catalog: self.catalog.clone(),
            group_families: self.group.then_some(true),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = psnav::config::resolve(args.config.clone(), args.overrides())?;

    psnav::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let options = SessionOptions {
        filter: args.filter.clone(),
        group_families: config.group_families,
        poll_interval: config.poll_interval(),
        colors: ColorConfig::from_env_and_args(args.no_color),
        ..SessionOptions::default()
    };

    let outcome = match &config.catalog {
        Some(path) => psnav::view::run(FixtureProvider::load(path)?, options)?,
        None => psnav::view::run(PwshProvider::new(config.shell.clone()), options)?,
    };

    if outcome == RunOutcome::NotFound {
        match &args.filter {
            Some(filter) => println!("No modules found matching '{filter}'"),
            None => println!("No modules found"),
        }
    }

    Ok(())
}
