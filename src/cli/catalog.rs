//! The static set of known extensions, indexed by name and alias

use crate::cli::extension::Extension;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_CATALOG: &str = include_str!("../../catalog/extensions.yaml");

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("unable to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("catalog format error: {0}")]
    Format(#[from] serde_yaml::Error),

    #[error("extension '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("extension '{name}' requires unknown extension '{missing}'")]
    UnknownDependency { name: String, missing: String },
}

/// Result of resolving a user supplied identifier against the catalog
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    ByName(&'a Extension),
    ByAlias(&'a Extension),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn extension(&self) -> Option<&'a Extension> {
        match self {
            Lookup::ByName(ext) | Lookup::ByAlias(ext) => Some(ext),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    extensions: Vec<Extension>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl Catalog {
    /// Loads the catalog at `path`, or the embedded one when no path is given
    pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogError> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Catalog::from_yaml(&contents)
            }
            None => Catalog::from_yaml(DEFAULT_CATALOG),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Catalog, CatalogError> {
        let extensions: Vec<Extension> = serde_yaml::from_str(contents)?;
        Catalog::new(extensions)
    }

    pub fn new(mut extensions: Vec<Extension>) -> Result<Catalog, CatalogError> {
        let mut by_name = HashMap::with_capacity(extensions.len());
        let mut by_alias = HashMap::new();

        for (idx, ext) in extensions.iter().enumerate() {
            if by_name.insert(ext.name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateName(ext.name.clone()));
            }
            if ext.alias.is_empty() {
                continue;
            }
            if let Some(prev) = by_alias.insert(ext.alias.clone(), idx) {
                return Err(CatalogError::DuplicateAlias {
                    alias: ext.alias.clone(),
                    first: extensions[prev].name.clone(),
                    second: ext.name.clone(),
                });
            }
        }

        // need_by is derived from requires, once, in catalog order
        let mut need_by: Vec<Vec<String>> = vec![Vec::new(); extensions.len()];
        for ext in &extensions {
            for dep in &ext.requires {
                let Some(&target) = by_name.get(dep) else {
                    return Err(CatalogError::UnknownDependency {
                        name: ext.name.clone(),
                        missing: dep.clone(),
                    });
                };
                need_by[target].push(ext.name.clone());
            }
        }
        for (ext, dependents) in extensions.iter_mut().zip(need_by) {
            ext.need_by = dependents;
        }

        Ok(Catalog {
            extensions,
            by_name,
            by_alias,
        })
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Canonical names win over aliases
    pub fn lookup(&self, identifier: &str) -> Lookup<'_> {
        if let Some(&idx) = self.by_name.get(identifier) {
            return Lookup::ByName(&self.extensions[idx]);
        }
        if let Some(&idx) = self.by_alias.get(identifier) {
            return Lookup::ByAlias(&self.extensions[idx]);
        }
        Lookup::NotFound
    }

    /// Every extension when `query` is `None`, otherwise the entries whose
    /// name, alias, description or category contain the query (ignoring case)
    pub fn find_by_query(&self, query: Option<&str>) -> Vec<&Extension> {
        match query {
            None => self.extensions.iter().collect(),
            Some(query) => self.search(query),
        }
    }

    pub fn search(&self, query: &str) -> Vec<&Extension> {
        let needle = query.to_lowercase();
        self.extensions
            .iter()
            .filter(|ext| {
                [&ext.name, &ext.alias, &ext.en_desc, &ext.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
- name: postgis
  alias: gis
  category: GIS
  en_desc: PostGIS geometry and geography spatial types and functions
  pg_ver: [16, 15, 14]
- name: postgis_raster
  category: GIS
  en_desc: PostGIS raster types and functions
  requires: [postgis]
- name: vector
  alias: pgvector
  category: RAG
  en_desc: vector data type and ivfflat and hnsw access methods
- name: gis
  category: UTIL
  en_desc: an extension whose name shadows an alias
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml(FIXTURE).unwrap()
    }

    #[test]
    fn embedded_catalog_loads() {
        let catalog = Catalog::load(None).unwrap();
        assert!(catalog.len() > 10);
        assert!(matches!(catalog.lookup("postgis"), Lookup::ByName(_)));
    }

    #[test]
    fn lookup_prefers_name_over_alias() {
        let catalog = catalog();

        match catalog.lookup("gis") {
            Lookup::ByName(ext) => assert_eq!(ext.category, "UTIL"),
            other => panic!("expected a name match, got {:?}", other),
        }
        match catalog.lookup("pgvector") {
            Lookup::ByAlias(ext) => assert_eq!(ext.name, "vector"),
            other => panic!("expected an alias match, got {:?}", other),
        }
        assert_eq!(catalog.lookup("nope"), Lookup::NotFound);
        assert!(catalog.lookup("nope").extension().is_none());
    }

    #[test]
    fn need_by_is_derived_from_requires() {
        let catalog = catalog();
        let postgis = catalog.lookup("postgis").extension().unwrap();

        assert_eq!(postgis.need_by, vec!["postgis_raster".to_string()]);
        assert!(catalog.lookup("vector").extension().unwrap().need_by.is_empty());
    }

    #[test]
    fn find_without_query_keeps_catalog_order() {
        let catalog = catalog();
        let names: Vec<&str> = catalog
            .find_by_query(None)
            .iter()
            .map(|e| e.name.as_str())
            .collect();

        assert_eq!(names, vec!["postgis", "postgis_raster", "vector", "gis"]);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let catalog = catalog();
        let names: Vec<&str> = catalog
            .find_by_query(Some("PostGIS"))
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["postgis", "postgis_raster"]);

        let names: Vec<&str> = catalog.search("gis").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["postgis", "postgis_raster", "gis"]);

        assert!(catalog.search("no such thing").is_empty());
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let err = Catalog::from_yaml("- {name: a, alias: x}\n- {name: b, alias: x}\n").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateAlias { ref first, ref second, .. } if first == "a" && second == "b"));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = Catalog::from_yaml("- {name: a}\n- {name: a}\n").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "a"));
    }

    #[test]
    fn unknown_dependency_is_rejected() {
        let err = Catalog::from_yaml("- {name: a, requires: [b]}\n").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDependency { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Catalog::load(Some(Path::new("/nonexistent/extensions.yaml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/extensions.yaml"));
    }
}
