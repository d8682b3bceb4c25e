use crate::cli::catalog::Catalog;
use crate::cli::config::Config;
use crate::cli::postgres::{HostProbe, PostgresProbe};
use crate::cli::resolver::{self, Resolution, ResolveError, Target};
use anyhow::Context;
use clap::Args;
use simplelog::*;

pub mod add;
pub mod info;
pub mod list;
pub mod remove;
pub mod scan;
pub mod status;
pub mod update;

/// Selects the Postgres installation an extension command works against
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Specify a postgres by major version
    #[arg(short = 'v', long = "version", default_value_t = 0)]
    pub version: u32,

    /// Specify a postgres by pg_config path
    #[arg(short = 'p', long = "path", default_value = "")]
    pub path: String,
}

impl TargetArgs {
    pub fn target(&self) -> Target {
        Target {
            version: self.version,
            pg_config: self.path.clone(),
        }
    }

    pub fn resolve(&self) -> Result<Resolution, ResolveError> {
        self.resolve_with(&HostProbe::default())
    }

    pub fn resolve_with(&self, probe: &dyn PostgresProbe) -> Result<Resolution, ResolveError> {
        resolver::resolve(probe, &self.target())
    }
}

pub fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let catalog =
        Catalog::load(config.catalog.as_deref()).context("failed to load extension catalog")?;
    debug!("loaded {} extensions", catalog.len());
    Ok(catalog)
}
