//! Tabular listing of many extensions

use crate::cli::extension::Extension;
use crate::cli::info::fit_width;
use crate::cli::postgres::{Installation, InstalledExtension};
use prettytable::{format, row, Table};

const DESC_WIDTH: usize = 56;

/// Which table a listing uses, decided by whether a version is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Common,
    Version(u32),
}

impl TableMode {
    pub fn for_major(major: u32) -> TableMode {
        if major == 0 {
            TableMode::Common
        } else {
            TableMode::Version(major)
        }
    }
}

pub fn tabulate(mode: TableMode, extensions: &[&Extension]) -> Table {
    match mode {
        TableMode::Common => tabulate_common(extensions),
        TableMode::Version(major) => tabulate_version(major, extensions),
    }
}

pub fn tabulate_common(extensions: &[&Extension]) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "Name",
        "Alias",
        "Version",
        "Category",
        "License",
        "PG Versions",
        "Description"
    ]);

    for ext in extensions {
        table.add_row(row![
            ext.name,
            ext.alias,
            ext.version,
            ext.category,
            ext.license,
            ext.pg_ver_str(),
            short_desc(&ext.en_desc)
        ]);
    }

    table
}

pub fn tabulate_version(major: u32, extensions: &[&Extension]) -> Table {
    let mut table = new_table();
    table.set_titles(row![
        "Name",
        "Alias",
        "Version",
        "Category",
        format!("PG{}", major),
        "Package",
        "Description"
    ]);

    for ext in extensions {
        let available = if ext.supports(major) { "Yes" } else { "No" };
        table.add_row(row![
            ext.name,
            ext.alias,
            ext.version,
            ext.category,
            available,
            package_label(ext),
            short_desc(&ext.en_desc)
        ]);
    }

    table
}

/// Installed extensions joined with their catalog entries, if any
pub fn tabulate_installed(rows: &[(&InstalledExtension, Option<&Extension>)]) -> Table {
    let mut table = new_table();
    table.set_titles(row!["Name", "Version", "Category", "Package", "Description"]);

    for (installed, ext) in rows {
        let (category, package, desc) = match ext {
            Some(ext) => (ext.category.as_str(), package_label(ext), ext.en_desc.as_str()),
            None => ("-", "-", installed.comment.as_str()),
        };
        table.add_row(row![
            installed.name,
            installed.default_version,
            category,
            package,
            short_desc(desc)
        ]);
    }

    table
}

pub fn tabulate_installations(installations: &[Installation], current: Option<&Installation>) -> Table {
    let mut table = new_table();
    table.set_titles(row!["", "Major", "Version", "pg_config"]);

    for installation in installations {
        let marker = match current {
            Some(current) if current.bin_dir == installation.bin_dir => "*",
            _ => "",
        };
        table.add_row(row![
            marker,
            installation.major_version,
            installation.version,
            installation.pg_config.display()
        ]);
    }

    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table
}

fn package_label(ext: &Extension) -> &str {
    match (ext.rpm_repo.is_empty(), ext.deb_repo.is_empty()) {
        (false, false) => "rpm,deb",
        (false, true) => "rpm",
        (true, false) => "deb",
        (true, true) => {
            if ext.contrib {
                "contrib"
            } else {
                "-"
            }
        }
    }
}

fn short_desc(desc: &str) -> String {
    fit_width(desc, DESC_WIDTH).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_yaml(
            r#"
- {name: postgis, alias: gis, category: GIS, version: "3.5.0", pg_ver: [16, 15], rpm_repo: PGDG, deb_repo: PGDG, en_desc: spatial types}
- {name: pg_duckdb, category: OLAP, version: "0.2.0", pg_ver: [17], rpm_repo: PIGSTY}
- {name: hstore, category: TYPE, contrib: true, pg_ver: [17, 16]}
"#,
        )
        .unwrap()
    }

    #[test]
    fn mode_follows_resolved_version() {
        assert_eq!(TableMode::for_major(0), TableMode::Common);
        assert_eq!(TableMode::for_major(16), TableMode::Version(16));
    }

    #[test]
    fn common_table_lists_every_extension() {
        let catalog = catalog();
        let rendered = tabulate(TableMode::Common, &catalog.find_by_query(None)).to_string();

        assert!(rendered.contains("PG Versions"));
        assert!(rendered.contains("16, 15"));
        assert!(!rendered.contains("PG16"));
        let postgis = rendered.find("postgis").unwrap();
        let duckdb = rendered.find("pg_duckdb").unwrap();
        assert!(postgis < duckdb);
    }

    #[test]
    fn version_table_marks_availability() {
        let catalog = catalog();
        let table = tabulate(TableMode::Version(16), &catalog.find_by_query(None));
        let rendered = table.to_string();

        assert!(rendered.contains("PG16"));
        let duckdb_line = rendered.lines().find(|l| l.contains("pg_duckdb")).unwrap();
        assert!(duckdb_line.contains("No"));
        let postgis_line = rendered.lines().find(|l| l.contains("postgis")).unwrap();
        assert!(postgis_line.contains("Yes"));
        assert!(postgis_line.contains("rpm,deb"));
        let hstore_line = rendered.lines().find(|l| l.contains("hstore")).unwrap();
        assert!(hstore_line.contains("contrib"));
    }

    #[test]
    fn installed_table_joins_catalog() {
        let catalog = catalog();
        let installed: Vec<InstalledExtension> = vec![
            InstalledExtension {
                name: "postgis".to_string(),
                default_version: "3.5.0".to_string(),
                comment: "PostGIS geometry".to_string(),
            },
            InstalledExtension {
                name: "plpgsql".to_string(),
                default_version: "1.0".to_string(),
                comment: "PL/pgSQL procedural language".to_string(),
            },
        ];
        let rows: Vec<_> = installed
            .iter()
            .map(|i| (i, catalog.lookup(&i.name).extension()))
            .collect();
        let rendered = tabulate_installed(&rows).to_string();

        let postgis_line = rendered.lines().find(|l| l.contains("postgis")).unwrap();
        assert!(postgis_line.contains("GIS"));
        assert!(postgis_line.contains("spatial types"));
        let plpgsql_line = rendered.lines().find(|l| l.contains("plpgsql")).unwrap();
        assert!(plpgsql_line.contains("PL/pgSQL procedural language"));
    }

    #[test]
    fn current_installation_is_marked() {
        let installation = |major: u32| Installation {
            major_version: major,
            version: format!("{}.2", major),
            pg_config: format!("/usr/pgsql-{}/bin/pg_config", major).into(),
            bin_dir: format!("/usr/pgsql-{}/bin", major).into(),
            share_dir: format!("/usr/pgsql-{}/share", major).into(),
            pkglib_dir: format!("/usr/pgsql-{}/lib", major).into(),
        };
        let installations = vec![installation(17), installation(16)];
        let rendered = tabulate_installations(&installations, Some(&installations[1])).to_string();

        let current = rendered.lines().find(|l| l.contains("16.2")).unwrap();
        assert!(current.trim_start().starts_with('*'));
        let other = rendered.lines().find(|l| l.contains("17.2")).unwrap();
        assert!(!other.contains('*'));
    }

    #[test]
    fn long_descriptions_are_cut() {
        assert_eq!(short_desc(&"d".repeat(100)).chars().count(), DESC_WIDTH);
        assert_eq!(short_desc("short"), "short");
    }
}
