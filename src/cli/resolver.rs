//! Decides which Postgres major version a command targets

use crate::cli::postgres::{Installation, PostgresProbe, ProbeError};
use simplelog::*;

pub const EXIT_USAGE: i32 = 1;
pub const EXIT_PG_CONFIG: i32 = 3;

/// What the user asked for on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Target {
    /// Major version, 0 when unset
    pub version: u32,
    /// Path to `pg_config`, empty when unset
    pub pg_config: String,
}

/// The version context every downstream operation of one invocation reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// 0 when no version is known
    pub major: u32,
    pub installation: Option<Installation>,
}

impl Resolution {
    pub fn is_known(&self) -> bool {
        self.major != 0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("both pg version and pg_config path are specified, please specify only one")]
    ConflictingTarget,

    #[error("failed to get PostgreSQL by pg_config path {path}: {source}")]
    PgConfig { path: String, source: ProbeError },
}

impl ResolveError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::ConflictingTarget => EXIT_USAGE,
            ResolveError::PgConfig { .. } => EXIT_PG_CONFIG,
        }
    }
}

/// An explicit version always wins, even without a matching installation.
/// A `pg_config` path must resolve, since it names one concrete installation.
/// Otherwise the active installation is adopted, if there is one.
pub fn resolve(probe: &dyn PostgresProbe, target: &Target) -> Result<Resolution, ResolveError> {
    let active = probe.detect();

    if target.version != 0 && !target.pg_config.is_empty() {
        return Err(ResolveError::ConflictingTarget);
    }

    if target.version != 0 {
        let installation = match probe.get(&target.version.to_string()) {
            Ok(installation) => Some(installation),
            Err(e) => {
                debug!(
                    "PostgreSQL installation {} not found: {}, but it's ok",
                    target.version, e
                );
                None
            }
        };
        return Ok(Resolution {
            major: target.version,
            installation,
        });
    }

    if !target.pg_config.is_empty() {
        let installation =
            probe
                .get(&target.pg_config)
                .map_err(|source| ResolveError::PgConfig {
                    path: target.pg_config.clone(),
                    source,
                })?;
        return Ok(Resolution {
            major: installation.major_version,
            installation: Some(installation),
        });
    }

    match active {
        Some(installation) => {
            debug!(
                "fallback to active PostgreSQL: {}",
                installation.major_version
            );
            Ok(Resolution {
                major: installation.major_version,
                installation: Some(installation),
            })
        }
        None => {
            debug!("no active PostgreSQL found, but it's ok");
            Ok(Resolution::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use mockall::predicate::*;
    use std::path::PathBuf;

    mock! {
        pub Probe {}
        impl PostgresProbe for Probe {
            fn detect(&self) -> Option<Installation>;
            fn get(&self, identifier: &str) -> Result<Installation, ProbeError>;
            fn list(&self) -> Vec<Installation>;
        }
    }

    fn installation(major: u32) -> Installation {
        Installation {
            major_version: major,
            version: format!("{}.1", major),
            pg_config: PathBuf::from(format!("/usr/pgsql-{}/bin/pg_config", major)),
            bin_dir: PathBuf::from(format!("/usr/pgsql-{}/bin", major)),
            share_dir: PathBuf::from(format!("/usr/pgsql-{}/share", major)),
            pkglib_dir: PathBuf::from(format!("/usr/pgsql-{}/lib", major)),
        }
    }

    fn target(version: u32, pg_config: &str) -> Target {
        Target {
            version,
            pg_config: pg_config.to_string(),
        }
    }

    #[test]
    fn nothing_known_resolves_to_zero() {
        let mut probe = MockProbe::new();
        probe.expect_detect().times(1).returning(|| None);
        probe.expect_get().never();

        let resolution = resolve(&probe, &Target::default()).unwrap();
        assert_eq!(resolution.major, 0);
        assert!(!resolution.is_known());
        assert!(resolution.installation.is_none());
    }

    #[test]
    fn active_installation_is_adopted() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| Some(installation(15)));
        probe.expect_get().never();

        let resolution = resolve(&probe, &Target::default()).unwrap();
        assert_eq!(resolution.major, 15);
        assert_eq!(resolution.installation, Some(installation(15)));
    }

    #[test]
    fn explicit_version_wins_without_installation() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| Some(installation(15)));
        probe
            .expect_get()
            .with(eq("13"))
            .times(1)
            .returning(|id| Err(ProbeError::NotFound(id.to_string())));

        let resolution = resolve(&probe, &target(13, "")).unwrap();
        assert_eq!(resolution.major, 13);
        assert!(resolution.installation.is_none());
    }

    #[test]
    fn explicit_version_picks_up_matching_installation() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| None);
        probe
            .expect_get()
            .with(eq("16"))
            .returning(|_| Ok(installation(16)));

        let resolution = resolve(&probe, &target(16, "")).unwrap();
        assert_eq!(resolution.major, 16);
        assert_eq!(resolution.installation, Some(installation(16)));
    }

    #[test]
    fn version_and_path_conflict() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| Some(installation(16)));
        probe.expect_get().never();

        let err = resolve(&probe, &target(16, "/usr/pgsql-16/bin/pg_config")).unwrap_err();
        assert!(matches!(err, ResolveError::ConflictingTarget));
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn path_returns_version_of_that_installation() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| Some(installation(17)));
        probe
            .expect_get()
            .with(eq("/usr/pgsql-14/bin/pg_config"))
            .returning(|_| Ok(installation(14)));

        let resolution = resolve(&probe, &target(0, "/usr/pgsql-14/bin/pg_config")).unwrap();
        assert_eq!(resolution.major, 14);
        assert_eq!(resolution.installation, Some(installation(14)));
    }

    #[test]
    fn unresolvable_path_is_fatal() {
        let mut probe = MockProbe::new();
        probe.expect_detect().returning(|| Some(installation(17)));
        probe
            .expect_get()
            .returning(|id| Err(ProbeError::NotFound(id.to_string())));

        let err = resolve(&probe, &target(0, "/opt/nowhere/pg_config")).unwrap_err();
        assert!(matches!(err, ResolveError::PgConfig { ref path, .. } if path == "/opt/nowhere/pg_config"));
        assert_eq!(err.exit_code(), EXIT_PG_CONFIG);
        assert_ne!(EXIT_PG_CONFIG, EXIT_USAGE);
    }
}
