//! Installing, removing and updating extension packages with the host's
//! package manager

use crate::cli::catalog::Catalog;
use crate::cli::extension::Extension;
use simplelog::*;
use spinners::{Spinner, Spinners};
use std::fmt;
use std::process::Command as ShellCommand;

const VERSION_PLACEHOLDER: &str = "$v";

#[derive(thiserror::Error, Debug)]
pub enum PackageError {
    #[error("no supported package manager found (dnf, yum or apt-get)")]
    NoPackageManager,

    #[error("no PostgreSQL version specified or detected, use --version or --path")]
    NoVersion,

    #[error("failed to execute {command}: {source}")]
    Exec {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} exited with status {code}{}", output_suffix(.output))]
    Failed {
        command: String,
        code: i32,
        output: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Dnf,
    Yum,
    Apt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Remove,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Install => write!(f, "install"),
            Action::Remove => write!(f, "remove"),
            Action::Update => write!(f, "update"),
        }
    }
}

impl PackageManager {
    pub fn detect() -> Option<PackageManager> {
        [
            ("dnf", PackageManager::Dnf),
            ("yum", PackageManager::Yum),
            ("apt-get", PackageManager::Apt),
        ]
        .into_iter()
        .find(|(binary, _)| which::which(binary).is_ok())
        .map(|(_, manager)| manager)
    }

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Apt => "apt-get",
        }
    }

    pub fn is_rpm(&self) -> bool {
        matches!(self, PackageManager::Dnf | PackageManager::Yum)
    }

    fn action_args(&self, action: Action) -> Vec<&'static str> {
        match (self, action) {
            (_, Action::Install) => vec!["install"],
            (_, Action::Remove) => vec!["remove"],
            (PackageManager::Apt, Action::Update) => vec!["install", "--only-upgrade"],
            (_, Action::Update) => vec!["upgrade"],
        }
    }

    /// Packages of `ext` for `major`, or `None` when this distribution
    /// family does not ship it for that version
    pub fn packages_for(&self, ext: &Extension, major: u32) -> Option<Vec<String>> {
        let (pkg, versions) = if self.is_rpm() {
            (&ext.rpm_pkg, &ext.rpm_pg)
        } else {
            (&ext.deb_pkg, &ext.deb_pg)
        };
        if pkg.is_empty() || !versions.contains(&major) {
            return None;
        }

        Some(
            pkg.split_whitespace()
                .map(|p| p.replace(VERSION_PLACEHOLDER, &major.to_string()))
                .collect(),
        )
    }
}

/// A single package manager invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PackagePlan {
    pub manager: PackageManager,
    pub action: Action,
    pub packages: Vec<String>,
    pub auto_confirm: bool,
}

impl PackagePlan {
    /// Maps extension names or aliases to packages, logging and skipping
    /// the ones that cannot be resolved
    pub fn build(
        manager: PackageManager,
        action: Action,
        major: u32,
        names: &[String],
        catalog: &Catalog,
        auto_confirm: bool,
    ) -> PackagePlan {
        let mut packages: Vec<String> = vec![];

        for name in names {
            let Some(ext) = catalog.lookup(name).extension() else {
                error!("extension '{}' not found", name);
                continue;
            };
            match manager.packages_for(ext, major) {
                Some(pkgs) => {
                    for pkg in pkgs {
                        if !packages.contains(&pkg) {
                            packages.push(pkg);
                        }
                    }
                }
                None => warn!(
                    "extension '{}' has no {} package for PostgreSQL {}",
                    ext.name,
                    manager.binary(),
                    major
                ),
            }
        }

        PackagePlan {
            manager,
            action,
            packages,
            auto_confirm,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .manager
            .action_args(self.action)
            .into_iter()
            .map(String::from)
            .collect();
        if self.auto_confirm {
            args.push("-y".to_string());
        }
        args.extend(self.packages.iter().cloned());
        args
    }

    pub fn command_line(&self) -> String {
        format!("{} {}", self.manager.binary(), self.args().join(" "))
    }

    /// The package manager process, prefixed with `sudo` when asked to
    pub fn command(&self, sudo: bool) -> ShellCommand {
        let mut command = if sudo {
            let mut command = ShellCommand::new("sudo");
            command.arg(self.manager.binary());
            command
        } else {
            ShellCommand::new(self.manager.binary())
        };
        command.args(self.args());
        command
    }

    pub fn run(&self) -> Result<(), PackageError> {
        let command_line = self.command_line();
        info!("{}", command_line);

        let sudo = sudo_wanted(
            effective_uid(),
            std::env::var("USER").ok().as_deref(),
            which::which("sudo").is_ok(),
        );
        let mut command = self.command(sudo);

        if !self.auto_confirm {
            // the prompt needs the terminal, so no spinner here
            let status = command.status().map_err(|source| PackageError::Exec {
                command: command_line.clone(),
                source,
            })?;
            return match status.code() {
                Some(0) => Ok(()),
                code => Err(PackageError::Failed {
                    command: command_line,
                    code: code.unwrap_or(-1),
                    output: String::new(),
                }),
            };
        }

        let mut sp = Spinner::new(
            Spinners::Line,
            format!("Running {} {}", self.manager.binary(), self.action),
        );
        let result = run_captured(&mut command, &command_line);
        sp.stop_with_newline();
        result
    }
}

/// Runs `command` with its output captured, returning the output of a
/// failed run in the error
fn run_captured(command: &mut ShellCommand, command_line: &str) -> Result<(), PackageError> {
    let output = command.output().map_err(|source| PackageError::Exec {
        command: command_line.to_string(),
        source,
    })?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let captured = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    Err(PackageError::Failed {
        command: command_line.to_string(),
        code: output.status.code().unwrap_or(-1),
        output: captured,
    })
}

fn effective_uid() -> Option<u32> {
    let output = ShellCommand::new("id").arg("-u").output().ok()?;
    parse_uid(&String::from_utf8_lossy(&output.stdout))
}

fn parse_uid(stdout: &str) -> Option<u32> {
    stdout.trim().parse().ok()
}

// $USER is only consulted when the uid is unknown
fn sudo_wanted(uid: Option<u32>, user: Option<&str>, sudo_available: bool) -> bool {
    let root = match uid {
        Some(uid) => uid == 0,
        None => user == Some("root"),
    };
    !root && sudo_available
}

fn output_suffix(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(":\n{}", output)
    }
}

/// Runs `action` for the named extensions against major version `major`
pub fn apply(
    action: Action,
    major: u32,
    names: &[String],
    catalog: &Catalog,
    auto_confirm: bool,
) -> Result<(), PackageError> {
    if major == 0 {
        return Err(PackageError::NoVersion);
    }
    let manager = PackageManager::detect().ok_or(PackageError::NoPackageManager)?;

    let plan = PackagePlan::build(manager, action, major, names, catalog, auto_confirm);
    if plan.is_empty() {
        warn!("no packages to {}", action);
        return Ok(());
    }

    plan.run()
}
