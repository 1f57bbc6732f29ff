//! Error kinds, one enum per failure scope.
//!
//! Setup failures abort a run, source failures skip one source, item
//! failures are counted against their split and never leave their task.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or validating the collector configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failure loading or saving a `data.yaml` taxonomy.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse taxonomy {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize taxonomy: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to write taxonomy {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Fatal failure while preparing the destination tree.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create destination directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    WriteTaxonomy(#[from] TaxonomyError),
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure that causes a single source to be skipped.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source taxonomy could not be loaded: {0}")]
    LoadTaxonomy(#[from] TaxonomyError),
    #[error("failed to list source directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure of one image/label pair.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("failed to read label {path}: {source}")]
    ReadLabel {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no mappable classes in label {path}")]
    NoMappableClasses { path: PathBuf },
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("label or image file is empty: {path}")]
    EmptyPayload { path: PathBuf },
    #[error("no sequence ids left for split {split}")]
    IdsExhausted { split: crate::split::Split },
    #[error("failed to write image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write label {path}: {source}")]
    WriteLabel {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure setting up the console and file log sinks.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to install logger: {0}")]
    Install(log::SetLoggerError),
}
