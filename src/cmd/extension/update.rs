// extension update command
use super::{load_catalog, TargetArgs};
use crate::cli::catalog::Catalog;
use crate::cli::config::Config;
use crate::cli::package_manager::{self, Action};
use crate::cli::postgres::InstalledExtension;
use crate::errors::UsageError;
use anyhow::{Context, Result};
use clap::Args;
use simplelog::*;

// example usage: pgext update            # every installed extension
//                pgext up postgis -y
/// Update installed extensions for the current pg version
#[derive(Args)]
pub struct UpdateCommand {
    /// Extension names or aliases, all installed extensions when omitted
    pub names: Vec<String>,

    /// Auto confirm update
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &UpdateCommand, config: &Config) -> Result<()> {
    let resolution = args.target.resolve()?;
    let catalog = load_catalog(config)?;

    let names = if args.names.is_empty() {
        let installation = resolution
            .installation
            .as_ref()
            .ok_or(UsageError::NoInstallation)?;
        let installed = installation.installed_extensions().with_context(|| {
            format!(
                "failed to read extensions of {}",
                installation.extension_dir().display()
            )
        })?;
        let names = installed_catalog_names(&catalog, &installed);
        debug!("updating installed extensions: {}", names.join(", "));
        names
    } else {
        args.names.clone()
    };

    package_manager::apply(Action::Update, resolution.major, &names, &catalog, args.yes)
        .context("failed to update extensions")
}

/// Installed extensions the catalog knows how to package
fn installed_catalog_names(catalog: &Catalog, installed: &[InstalledExtension]) -> Vec<String> {
    installed
        .iter()
        .filter_map(|i| catalog.lookup(&i.name).extension())
        .filter(|ext| !ext.contrib)
        .map(|ext| ext.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_packaged_catalog_extensions_are_updated() {
        let catalog = Catalog::from_yaml(
            "- {name: vector, alias: pgvector}\n- {name: hstore, contrib: true}\n",
        )
        .unwrap();
        let installed: Vec<InstalledExtension> = ["hstore", "plpgsql", "vector"]
            .iter()
            .map(|name| InstalledExtension {
                name: name.to_string(),
                default_version: String::new(),
                comment: String::new(),
            })
            .collect();

        assert_eq!(installed_catalog_names(&catalog, &installed), vec!["vector"]);
    }
}
