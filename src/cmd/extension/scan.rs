// extension scan command
use super::TargetArgs;
use crate::cli::postgres::{HostProbe, PostgresProbe};
use crate::cli::tabulate::tabulate_installations;
use crate::errors::UsageError;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Write};

// example usage: pgext scan -v 17
/// Scan installed extensions for the active pg
#[derive(Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub fn execute(args: &ScanCommand) -> Result<()> {
    scan(&HostProbe::default(), &args.target, &mut io::stdout().lock())
}

fn scan(probe: &dyn PostgresProbe, target: &TargetArgs, out: &mut dyn Write) -> Result<()> {
    let resolution = target.resolve_with(probe)?;

    // the summary is shown even when no installation is resolved
    let installations = probe.list();
    writeln!(out, "Installed PostgreSQL:")?;
    write!(
        out,
        "{}",
        tabulate_installations(&installations, resolution.installation.as_ref())
    )?;

    let Some(installation) = resolution.installation.as_ref() else {
        return Err(UsageError::NoInstallation.into());
    };

    let dir = installation.extension_dir();
    let extensions = installation
        .installed_extensions()
        .with_context(|| format!("failed to read extensions of {}", dir.display()))?;
    let libraries = installation.shared_libraries().with_context(|| {
        format!(
            "failed to read libraries of {}",
            installation.pkglib_dir.display()
        )
    })?;

    writeln!(out)?;
    writeln!(
        out,
        "PostgreSQL {} ({})",
        installation.version,
        installation.pg_config.display()
    )?;
    writeln!(out, "Extension Dir : {}", dir.display())?;
    writeln!(out, "Library Dir   : {}", installation.pkglib_dir.display())?;
    writeln!(out, "Extensions    : {}", extensions.len())?;
    writeln!(out, "Libraries     : {}", libraries.len())?;
    writeln!(out)?;
    for ext in &extensions {
        writeln!(out, "  {} ({})", ext.name, ext.default_version)?;
    }

    Ok(())
}
