// extension list command
use super::{load_catalog, TargetArgs};
use crate::cli::config::Config;
use crate::cli::tabulate::{tabulate, TableMode};
use crate::errors::UsageError;
use anyhow::Result;
use clap::Args;
use simplelog::*;

// example usage: pgext list gis -v 16
/// List & search available extensions
#[derive(Args)]
pub struct ListCommand {
    /// Search extensions by name, alias, description or category
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &ListCommand, config: &Config) -> Result<()> {
    if args.query.len() > 1 {
        return Err(UsageError::TooManyQueries.into());
    }

    let resolution = args.target.resolve()?;
    let catalog = load_catalog(config)?;

    let query = args.query.first().map(String::as_str);
    let results = catalog.find_by_query(query);
    if let Some(query) = query {
        if results.is_empty() {
            warn!("no extensions found matching '{}'", query);
            return Ok(());
        }
        info!("found {} extensions matching '{}':", results.len(), query);
    }

    if !resolution.is_known() {
        debug!("no active PostgreSQL found, fallback to common tabulate");
    }
    print!("{}", tabulate(TableMode::for_major(resolution.major), &results));

    Ok(())
}
