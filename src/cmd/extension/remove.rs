// extension rm command
use super::{load_catalog, TargetArgs};
use crate::cli::config::Config;
use crate::cli::package_manager::{self, Action};
use anyhow::{Context, Result};
use clap::Args;

// example usage: pgext rm pg_duckdb -y
/// Remove postgres extensions
#[derive(Args)]
pub struct RemoveCommand {
    /// Extension names or aliases
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Auto confirm removal
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &RemoveCommand, config: &Config) -> Result<()> {
    let resolution = args.target.resolve()?;
    let catalog = load_catalog(config)?;

    package_manager::apply(
        Action::Remove,
        resolution.major,
        &args.names,
        &catalog,
        args.yes,
    )
    .context("failed to remove extensions")
}
