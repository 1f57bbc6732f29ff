use clap::Parser;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::class_sync::ClassSync;
use crate::error::ConfigError;

pub const DEFAULT_WORKERS: usize = 15;

/// Command-line arguments for merging datasets into one destination tree.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Path of the collector configuration file
    #[arg(short = 'c', long = "config", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Worker threads, overrides the config file
    #[arg(short = 'w', long = "workers", value_parser = validate_workers)]
    pub workers: Option<usize>,

    /// Disable the progress bar
    #[arg(long = "no_progress")]
    pub no_progress: bool,

    /// Directory receiving the run's log file
    #[arg(long = "log_dir", default_value = ".")]
    pub log_dir: PathBuf,
}

// Validate that the worker count is at least one
fn validate_workers(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(val) if val >= 1 => Ok(val),
        _ => Err("WORKERS must be a positive integer".to_string()),
    }
}

/// One dataset to merge: its root and how its classes map onto the destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub src: PathBuf,
    #[serde(rename = "class_name_sync", default)]
    pub class_sync: ClassSync,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dest: PathBuf,
    pub classes: Vec<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the collector cannot run; warn about sync entries that can never match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".to_string()));
        }
        if self.classes.is_empty() {
            return Err(ConfigError::Invalid("classes must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate class '{}'", class)));
            }
        }

        for source in &self.sources {
            if source.class_sync.is_empty() {
                warn!(
                    "Source {} has no class_name_sync entries, nothing will be collected",
                    source.src.display()
                );
            }
            for canonical in source.class_sync.canonical_names() {
                if !seen.contains(canonical) {
                    warn!(
                        "Source {} maps to '{}', which is not a destination class",
                        source.src.display(),
                        canonical
                    );
                }
            }
        }
        Ok(())
    }
}
