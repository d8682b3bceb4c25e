// extension status command
use super::{load_catalog, TargetArgs};
use crate::cli::config::Config;
use crate::cli::tabulate::tabulate_installed;
use anyhow::{Context, Result};
use clap::Args;
use simplelog::*;

// example usage: pgext status -c
/// Show installed extensions on the active pg
#[derive(Args)]
pub struct StatusCommand {
    /// Show contrib extensions too
    #[arg(short = 'c', long = "contrib")]
    pub contrib: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &StatusCommand, config: &Config) -> Result<()> {
    let resolution = args.target.resolve()?;
    let Some(installation) = resolution.installation.as_ref() else {
        warn!("no PostgreSQL installation found, specify a pg_config path or pg version");
        return Ok(());
    };

    let catalog = load_catalog(config)?;
    let installed = installation.installed_extensions().with_context(|| {
        format!(
            "failed to read extensions of {}",
            installation.extension_dir().display()
        )
    })?;

    let rows: Vec<_> = installed
        .iter()
        .map(|i| (i, catalog.lookup(&i.name).extension()))
        .filter(|(_, ext)| args.contrib || !ext.map_or(false, |e| e.contrib))
        .collect();
    let hidden = installed.len() - rows.len();

    println!(
        "PostgreSQL {} ({})",
        installation.version,
        installation.pg_config.display()
    );
    print!("{}", tabulate_installed(&rows));
    if hidden > 0 {
        info!(
            "{} contrib extensions hidden, use --contrib to show them",
            hidden
        );
    }

    Ok(())
}
