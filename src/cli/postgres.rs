//! Discovery of local Postgres installations through their `pg_config`

use simplelog::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as ShellCommand;

/// Oldest major version pgext knows how to target
const MIN_MAJOR_VERSION: u32 = 10;
const MAX_MAJOR_VERSION: u32 = 18;

#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("no PostgreSQL installation found for {0}")]
    NotFound(String),

    #[error("failed to execute {path}: {source}")]
    Exec {
        path: String,
        source: std::io::Error,
    },

    #[error("unexpected pg_config output from {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("PostgreSQL {0} is not supported, 10 or newer is required")]
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Installation {
    pub major_version: u32,
    pub version: String,
    pub pg_config: PathBuf,
    pub bin_dir: PathBuf,
    pub share_dir: PathBuf,
    pub pkglib_dir: PathBuf,
}

/// An extension control file found in an installation's share directory
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledExtension {
    pub name: String,
    pub default_version: String,
    pub comment: String,
}

/// Seam between the resolver and the host: everything it needs to know
/// about local installations
pub trait PostgresProbe {
    /// The installation whose `pg_config` comes first on `PATH`, if any
    fn detect(&self) -> Option<Installation>;

    /// Looks an installation up by major version number or `pg_config` path
    fn get(&self, identifier: &str) -> Result<Installation, ProbeError>;

    /// Every installation found on the host, newest major first
    fn list(&self) -> Vec<Installation>;
}

#[derive(Default)]
pub struct HostProbe {}

impl PostgresProbe for HostProbe {
    fn detect(&self) -> Option<Installation> {
        let pg_config = which::which("pg_config").ok()?;
        match probe_pg_config(&pg_config) {
            Ok(installation) => {
                debug!(
                    "active PostgreSQL {} found at {}",
                    installation.major_version,
                    pg_config.display()
                );
                Some(installation)
            }
            Err(e) => {
                debug!("ignoring pg_config on PATH: {}", e);
                None
            }
        }
    }

    fn get(&self, identifier: &str) -> Result<Installation, ProbeError> {
        if let Ok(major) = identifier.parse::<u32>() {
            return self
                .list()
                .into_iter()
                .find(|i| i.major_version == major)
                .ok_or_else(|| ProbeError::NotFound(format!("version {}", major)));
        }

        let mut path = PathBuf::from(identifier);
        if path.is_dir() {
            path.push("pg_config");
        }
        if !path.is_file() {
            return Err(ProbeError::NotFound(identifier.to_string()));
        }
        probe_pg_config(&path)
    }

    fn list(&self) -> Vec<Installation> {
        let mut seen = HashSet::new();
        let mut installations: Vec<Installation> = candidate_paths()
            .into_iter()
            .filter(|path| path.is_file())
            .filter(|path| seen.insert(fs::canonicalize(path).unwrap_or_else(|_| path.clone())))
            .filter_map(|path| match probe_pg_config(&path) {
                Ok(installation) => Some(installation),
                Err(e) => {
                    debug!("skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        dedup_installations(installations)
    }
}

/// Collapses candidates that report the same binaries, e.g. Debian's
/// `/usr/bin/pg_config` wrapper and the versioned one it dispatches to.
/// The first candidate wins; the result is sorted newest major first.
fn dedup_installations(installations: Vec<Installation>) -> Vec<Installation> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Installation> = installations
        .into_iter()
        .filter(|i| {
            let bin_dir = fs::canonicalize(&i.bin_dir).unwrap_or_else(|_| i.bin_dir.clone());
            seen.insert((i.major_version, bin_dir))
        })
        .collect();

    unique.sort_by(|a, b| b.major_version.cmp(&a.major_version));
    unique
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = which::which_all("pg_config")
        .map(|found| found.collect())
        .unwrap_or_default();

    for major in (MIN_MAJOR_VERSION..=MAX_MAJOR_VERSION).rev() {
        // EL family (PGDG rpm)
        paths.push(PathBuf::from(format!("/usr/pgsql-{}/bin/pg_config", major)));
        // Debian family (PGDG apt)
        paths.push(PathBuf::from(format!(
            "/usr/lib/postgresql/{}/bin/pg_config",
            major
        )));
    }
    paths.push(PathBuf::from("/usr/local/pgsql/bin/pg_config"));

    paths
}

/// Runs `pg_config` and reads the version and directories it reports
pub fn probe_pg_config(pg_config: &Path) -> Result<Installation, ProbeError> {
    let output = ShellCommand::new(pg_config)
        .arg("--version")
        .arg("--bindir")
        .arg("--sharedir")
        .arg("--pkglibdir")
        .output()
        .map_err(|source| ProbeError::Exec {
            path: pg_config.display().to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_pg_config_output(pg_config, &stdout)
}

fn parse_pg_config_output(pg_config: &Path, stdout: &str) -> Result<Installation, ProbeError> {
    let parse_error = |detail: &str| ProbeError::Parse {
        path: pg_config.display().to_string(),
        detail: detail.to_string(),
    };

    let lines: Vec<&str> = stdout.lines().map(str::trim_end).collect();
    let [version_line, bin_dir, share_dir, pkglib_dir] = lines.as_slice() else {
        return Err(parse_error("expected 4 lines"));
    };

    let version = version_line
        .strip_prefix("PostgreSQL ")
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| parse_error(*version_line))?;
    let major_version = parse_major_version(version).ok_or_else(|| parse_error(version))?;
    if major_version < MIN_MAJOR_VERSION {
        return Err(ProbeError::Unsupported(version.to_string()));
    }

    Ok(Installation {
        major_version,
        version: version.to_string(),
        pg_config: pg_config.to_path_buf(),
        bin_dir: PathBuf::from(*bin_dir),
        share_dir: PathBuf::from(*share_dir),
        pkglib_dir: PathBuf::from(*pkglib_dir),
    })
}

/// `16.4` -> 16, `17beta1` -> 17, `9.6.24` -> 9
pub fn parse_major_version(version: &str) -> Option<u32> {
    let digits: String = version.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl Installation {
    pub fn extension_dir(&self) -> PathBuf {
        self.share_dir.join("extension")
    }

    /// Extensions with a control file in this installation, sorted by name
    pub fn installed_extensions(&self) -> std::io::Result<Vec<InstalledExtension>> {
        let mut extensions = vec![];

        for entry in fs::read_dir(self.extension_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("control") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let contents = fs::read_to_string(&path)?;
            extensions.push(parse_control_file(name, &contents));
        }

        extensions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(extensions)
    }

    /// Shared libraries shipped in the package library directory
    pub fn shared_libraries(&self) -> std::io::Result<Vec<String>> {
        let mut libs: Vec<String> = fs::read_dir(&self.pkglib_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                match path.extension().and_then(|e| e.to_str()) {
                    Some("so") | Some("dylib") => {
                        path.file_stem().and_then(|s| s.to_str()).map(String::from)
                    }
                    _ => None,
                }
            })
            .collect();
        libs.sort();
        Ok(libs)
    }
}

fn parse_control_file(name: &str, contents: &str) -> InstalledExtension {
    let mut installed = InstalledExtension {
        name: name.to_string(),
        default_version: String::new(),
        comment: String::new(),
    };

    for line in contents.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('\'').to_string();
        match key.trim() {
            "default_version" => installed.default_version = value,
            "comment" => installed.comment = value,
            _ => {}
        }
    }

    installed
}
