// extension add command
use super::{load_catalog, TargetArgs};
use crate::cli::config::Config;
use crate::cli::package_manager::{self, Action};
use anyhow::{Context, Result};
use clap::Args;

// example usage: pgext add postgis timescaledb -v 16 -y
/// Install postgres extensions
#[derive(Args)]
pub struct AddCommand {
    /// Extension names or aliases
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Auto confirm install
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &AddCommand, config: &Config) -> Result<()> {
    let resolution = args.target.resolve()?;
    let catalog = load_catalog(config)?;

    package_manager::apply(
        Action::Install,
        resolution.major,
        &args.names,
        &catalog,
        args.yes,
    )
    .context("failed to install extensions")
}
