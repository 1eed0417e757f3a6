//! Dashboard configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file
//! (`reelscope.toml` in the working directory, or the path named by
//! `REELSCOPE_CONFIG`), then environment variables. A value that fails to
//! parse is reported and the previous layer's value is kept.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;

use crate::error::ConfigError;
use crate::smoothing::DEFAULT_SMOOTHING_POINTS;

pub const DEFAULT_CSV_DIR: &str = "csvs";
pub const DEFAULT_CONFIG_FILE: &str = "reelscope.toml";

pub const ENV_CONFIG: &str = "REELSCOPE_CONFIG";
pub const ENV_CSV_DIR: &str = "REELSCOPE_CSV_DIR";
pub const ENV_SMOOTHING_POINTS: &str = "REELSCOPE_SMOOTHING_POINTS";
pub const ENV_DEBUG: &str = "REELSCOPE_DEBUG";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Directory scanned for `<franchise>_movies.csv` files.
    pub csv_dir: PathBuf,
    /// Resample count for smoothed curves.
    pub smoothing_points: usize,
    /// Verbose logging.
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            smoothing_points: DEFAULT_SMOOTHING_POINTS,
            debug: false,
        }
    }
}

/// Shape of the optional TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub csv_dir: Option<PathBuf>,
    pub smoothing_points: Option<usize>,
    pub debug: Option<bool>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DashboardConfig {
    /// Resolve from the process environment and the optional config file.
    /// Resolution never fails; problems come back alongside the config so the
    /// caller can report them once logging is up.
    pub fn load() -> (Self, Vec<ConfigError>) {
        let lookup = |key: &str| std::env::var(key).ok();

        let explicit = lookup(ENV_CONFIG).map(PathBuf::from);
        let file_path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut problems = Vec::new();
        let file = if explicit.is_some() || file_path.is_file() {
            match FileConfig::read(&file_path) {
                Ok(file) => Some(file),
                Err(err) => {
                    problems.push(err);
                    None
                }
            }
        } else {
            None
        };

        let (config, env_problems) = Self::resolve(file, lookup);
        problems.extend(env_problems);
        (config, problems)
    }

    /// Log level for the `debug` toggle.
    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Layer `file` and then `env` over the defaults.
    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut problems = Vec::new();

        if let Some(file) = file {
            if let Some(dir) = file.csv_dir {
                config.csv_dir = dir;
            }
            match file.smoothing_points {
                Some(0) => problems.push(ConfigError::InvalidValue {
                    key: "smoothing_points",
                    value: "0".into(),
                }),
                Some(points) => config.smoothing_points = points,
                None => {}
            }
            if let Some(debug) = file.debug {
                config.debug = debug;
            }
        }

        if let Some(dir) = env(ENV_CSV_DIR).filter(|dir| !dir.trim().is_empty()) {
            config.csv_dir = PathBuf::from(dir.trim());
        }

        if let Some(raw) = env(ENV_SMOOTHING_POINTS) {
            match raw.trim().parse::<usize>() {
                Ok(points) if points > 0 => config.smoothing_points = points,
                _ => problems.push(ConfigError::InvalidValue {
                    key: ENV_SMOOTHING_POINTS,
                    value: raw,
                }),
            }
        }

        if let Some(raw) = env(ENV_DEBUG) {
            match parse_flag(&raw) {
                Some(flag) => config.debug = flag,
                None => problems.push(ConfigError::InvalidValue {
                    key: ENV_DEBUG,
                    value: raw,
                }),
            }
        }

        (config, problems)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
