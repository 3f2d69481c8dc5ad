//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: when using file mode, the directory for log files (default "./logs")
//! - LOG_MAX_SIZE: when using file mode, the size in bytes after which a new file is started
//!   (default 1GB)

use chrono::Utc;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, metadata, OpenOptions},
    path::Path,
};
use thiserror::Error;

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;
const LOG_FILE_NAME: &str = "processor.log";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("LOG_MAX_SIZE must be a byte count, got {0:?}")]
    InvalidMaxSize(String),
    #[error("Unable to open log file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stdout,
    File,
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub mode: LogMode,
    pub level: LevelFilter,
    pub dir: String,
    pub max_size: u64,
}

impl LogSettings {
    /// Unknown modes and levels fall back to stdout and info. A malformed
    /// `LOG_MAX_SIZE` is an error.
    pub fn from_env() -> Result<Self, LoggingError> {
        let mode = match env::var("LOG_MODE") {
            Ok(mode) if mode.eq_ignore_ascii_case("file") => LogMode::File,
            _ => LogMode::Stdout,
        };
        let level = env::var("LOG_LEVEL")
            .map(|level| parse_level(&level))
            .unwrap_or(LevelFilter::Info);
        let dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        let max_size = match env::var("LOG_MAX_SIZE") {
            Ok(size) => size
                .trim()
                .parse::<u64>()
                .map_err(|_| LoggingError::InvalidMaxSize(size))?,
            Err(_) => DEFAULT_LOG_MAX_SIZE,
        };

        Ok(Self {
            mode,
            level,
            dir,
            max_size,
        })
    }

    /// Base log file inside `dir`; rolled files derive their names from it.
    pub fn base_file_path(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), LOG_FILE_NAME)
    }
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Computes the path of the rolled log file given the base file path and the date string.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
    let stem = base_file_path
        .strip_suffix(".log")
        .unwrap_or(base_file_path);
    format!("{}-{}.{}.log", stem, date_str, index)
}

/// Checks if the given log file exceeds the maximum allowed size (in bytes).
/// If so, moves on to the next index until a file with room is found.
/// Returns the final log file path to use.
pub fn space_based_rolling(
    file_path: &str,
    base_file_path: &str,
    date_str: &str,
    max_size: u64,
) -> String {
    let mut final_path = file_path.to_string();
    let mut index = 1;
    while let Ok(metadata) = metadata(&final_path) {
        if metadata.len() > max_size {
            index += 1;
            final_path = compute_rolled_file_path(base_file_path, date_str, index);
        } else {
            break;
        }
    }
    final_path
}

/// Resolves the file the logger should append to today, creating the log
/// directory when needed.
pub fn resolve_log_file(settings: &LogSettings, date_str: &str) -> Result<String, LoggingError> {
    let base_file_path = settings.base_file_path();
    let first = compute_rolled_file_path(&base_file_path, date_str, 1);

    if let Some(parent) = Path::new(&first).parent() {
        create_dir_all(parent).map_err(|source| LoggingError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    Ok(space_based_rolling(
        &first,
        &base_file_path,
        date_str,
        settings.max_size,
    ))
}

/// Sets up logging by reading configuration from environment variables.
pub fn setup_logging() -> Result<(), LoggingError> {
    let settings = LogSettings::from_env()?;

    match settings.mode {
        LogMode::File => {
            let date_str = Utc::now().format("%Y-%m-%d").to_string();
            let final_path = resolve_log_file(&settings, &date_str)?;
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&final_path)
                .map_err(|source| LoggingError::Io {
                    path: final_path.clone(),
                    source,
                })?;
            WriteLogger::init(settings.level, Config::default(), log_file)?;
            info!("Logging to file: {}", final_path);
        }
        LogMode::Stdout => {
            SimpleLogger::init(settings.level, Config::default())?;
        }
    }

    info!(
        "Logging is successfully configured (mode: {:?}, level: {})",
        settings.mode, settings.level
    );
    Ok(())
}
