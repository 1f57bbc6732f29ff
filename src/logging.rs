//! Console plus file logging.
//!
//! Every record is written to stderr and to a per-run log file named after
//! the moment the run started.

use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target, WriteStyle};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::LoggingError;

/// Log file name for a run started at `now`.
pub fn log_file_name(now: &DateTime<Local>) -> String {
    format!("logs_collector_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Logger builder writing to stderr and `file`, `info` unless `RUST_LOG` says otherwise.
pub fn logger_builder(file: File) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .write_style(WriteStyle::Never);
    builder
}

/// Create the run's log file under `dir` and install the global logger.
/// Returns the log file path.
pub fn init_logging(dir: &Path) -> Result<PathBuf, LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateFile {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(log_file_name(&Local::now()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::CreateFile {
            path: path.clone(),
            source,
        })?;

    logger_builder(file).try_init().map_err(LoggingError::Install)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use log::{Level, LevelFilter, Log, Record};

    #[test]
    fn test_log_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(log_file_name(&now), "logs_collector_2024-03-05_07-08-09.log");
    }

    #[test]
    fn test_records_reach_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("run.log");
        let file = File::create(&path).unwrap();

        let logger = logger_builder(file).filter_level(LevelFilter::Info).build();
        logger.log(
            &Record::builder()
                .args(format_args!("Dataset collected. id=7"))
                .level(Level::Error)
                .target("dataset_collector")
                .build(),
        );
        logger.flush();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("ERROR"));
        assert!(content.contains("Dataset collected. id=7"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_init_logging_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("logs");

        let path = init_logging(&dir).unwrap();
        log::error!("Skipping source missing: not found");
        log::logger().flush();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("logs_collector_"));
        assert!(name.ends_with(".log"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Skipping source missing: not found"));
    }
}
