// extension info command
use super::{load_catalog, TargetArgs};
use crate::cli::catalog::Lookup;
use crate::cli::config::Config;
use crate::cli::info::InfoRenderer;
use anyhow::Result;
use clap::Args;
use simplelog::*;

// example usage: pgext info postgis timescaledb
/// Get extension information
#[derive(Args)]
pub struct InfoCommand {
    /// Extension names or aliases
    #[arg(required = true)]
    pub names: Vec<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &InfoCommand, config: &Config) -> Result<()> {
    let resolution = args.target.resolve()?;
    debug!("using PostgreSQL version: {}", resolution.major);

    let catalog = load_catalog(config)?;
    let renderer = InfoRenderer::new()?;

    for name in &args.names {
        let ext = match catalog.lookup(name) {
            Lookup::ByName(ext) => ext,
            Lookup::ByAlias(ext) => {
                debug!("'{}' is an alias of '{}'", name, ext.name);
                ext
            }
            Lookup::NotFound => {
                error!("extension '{}' not found", name);
                continue;
            }
        };
        print!("{}", renderer.render(ext)?);
    }

    Ok(())
}
