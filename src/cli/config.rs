use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Alternative catalog file, replaces the embedded one
    pub catalog: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Reads the config file, falling back to defaults when there is none
    pub fn load(file_path: &Path) -> anyhow::Result<Config> {
        if !file_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Couldn't read config file {}", file_path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Issue with format of toml file {}", file_path.display()))?;

        if let Some(catalog) = config.catalog.take() {
            config.catalog = Some(absolute(catalog));
        }

        Ok(config)
    }

    pub fn full_path(file_path: Option<&Path>) -> PathBuf {
        // if a path was provided
        if let Some(path) = file_path {
            return absolute(path.to_path_buf());
        }

        // if home directory can not be determined, use the current directory
        match home::home_dir() {
            Some(mut path) => {
                path.push(".config");
                path.push("pgext");
                path.push(CONFIG_FILE_NAME);

                path
            }
            None => absolute(PathBuf::from(CONFIG_FILE_NAME)),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(log::LevelFilter::Info)
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_relative() {
        match env::current_dir() {
            Ok(dir) => dir.join(path),
            Err(_) => path,
        }
    } else {
        path
    }
}
