// Extensions are catalog entries describing a Postgres extension and how it
// is packaged for each distribution family

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Extension {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub summary_url: String,
    #[serde(default)]
    pub en_desc: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub contrib: bool,

    /// Supported major versions, newest first
    #[serde(default)]
    pub pg_ver: Vec<u32>,

    #[serde(default)]
    pub need_ddl: bool,
    #[serde(default)]
    pub need_load: bool,
    #[serde(default)]
    pub create_sql: String,
    #[serde(default)]
    pub shared_lib: String,
    #[serde(default)]
    pub super_user: String,
    #[serde(default)]
    pub relocatable: Relocatable,
    #[serde(default, rename = "schema")]
    pub schema_str: String,

    #[serde(default)]
    pub requires: Vec<String>,
    /// Reverse of `requires`, filled in by the catalog once every entry is loaded
    #[serde(skip)]
    pub need_by: Vec<String>,

    #[serde(default)]
    pub rpm_repo: String,
    #[serde(default)]
    pub rpm_pkg: String,
    #[serde(default)]
    pub rpm_ver: String,
    #[serde(default)]
    pub rpm_pg: Vec<u32>,
    #[serde(default)]
    pub rpm_deps: Vec<String>,

    #[serde(default)]
    pub deb_repo: String,
    #[serde(default)]
    pub deb_pkg: String,
    #[serde(default)]
    pub deb_ver: String,
    #[serde(default)]
    pub deb_pg: Vec<u32>,
    #[serde(default)]
    pub deb_deps: Vec<String>,

    #[serde(default)]
    pub bad_case: Vec<String>,
}

impl Extension {
    pub fn supports(&self, major: u32) -> bool {
        self.pg_ver.contains(&major)
    }

    pub fn pg_ver_str(&self) -> String {
        join_versions(&self.pg_ver)
    }
}

/// Whether the objects of an extension may be moved to another schema.
/// Catalogs spell this `t` / `f`, anything else is kept as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relocatable {
    Relocatable,
    NotRelocatable,
    #[default]
    Unknown,
}

impl From<&str> for Relocatable {
    fn from(value: &str) -> Self {
        match value {
            "t" => Relocatable::Relocatable,
            "f" => Relocatable::NotRelocatable,
            _ => Relocatable::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Relocatable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Relocatable::from).unwrap_or_default())
    }
}

pub fn join_versions(versions: &[u32]) -> String {
    versions
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relocatable_from_catalog_value() {
        assert_eq!(Relocatable::from("t"), Relocatable::Relocatable);
        assert_eq!(Relocatable::from("f"), Relocatable::NotRelocatable);
        assert_eq!(Relocatable::from(""), Relocatable::Unknown);
        assert_eq!(Relocatable::from("true"), Relocatable::Unknown);
    }

    #[test]
    fn deserialize_minimal_entry() {
        let ext: Extension = serde_yaml::from_str("name: pg_trgm\nrelocatable: t\npg_ver: [17, 16]\n").unwrap();

        assert_eq!(ext.name, "pg_trgm");
        assert_eq!(ext.relocatable, Relocatable::Relocatable);
        assert_eq!(ext.pg_ver_str(), "17, 16");
        assert!(ext.supports(16));
        assert!(!ext.supports(12));
        assert!(ext.need_by.is_empty());
        assert!(ext.alias.is_empty());
    }

    #[test]
    fn missing_relocatable_is_unknown() {
        let ext: Extension = serde_yaml::from_str("name: plpgsql\nrelocatable: ~\n").unwrap();
        assert_eq!(ext.relocatable, Relocatable::Unknown);
    }
}
