//! Integration test for file logging.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: when using file mode, the directory for log files (default "./logs")
//! - LOG_MAX_SIZE: byte size after which a new file is started
//!   Refer to `src/logging/mod.rs` for more details.
use chrono::Utc;
use relayer_processor::logging::{compute_rolled_file_path, setup_logging, LoggingError};
use std::{env, fs, sync::Mutex, thread, time::Duration};
use tempfile::TempDir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn clear_env() {
    for var in ["LOG_MODE", "LOG_LEVEL", "LOG_DATA_DIR", "LOG_MAX_SIZE"] {
        env::remove_var(var);
    }
}

#[test]
fn test_invalid_log_max_size_is_reported() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    clear_env();
    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_DATA_DIR", temp_dir.path());
    env::set_var("LOG_MAX_SIZE", "invalid_value");

    let result = setup_logging();
    clear_env();

    assert!(matches!(result, Err(LoggingError::InvalidMaxSize(_))));
}

// Installs the process-wide logger, so it is the only test that succeeds in
// calling setup_logging.
#[test]
fn test_setup_logging_file_mode_creates_log_file() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_dir = temp_dir.path().join("logs");

    clear_env();
    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("LOG_DATA_DIR", &log_dir);

    setup_logging().expect("Failed to set up logging");
    log::info!("file logging integration test");
    clear_env();

    // Give the logger a moment to flush.
    thread::sleep(Duration::from_millis(100));

    let date_str = Utc::now().format("%Y-%m-%d").to_string();
    let base = log_dir.join("processor.log");
    let expected = compute_rolled_file_path(base.to_str().unwrap(), &date_str, 1);
    let contents = fs::read_to_string(&expected).expect("Log file was not created");

    assert!(contents.contains("file logging integration test"));

    // A second install is rejected rather than silently ignored.
    assert!(matches!(setup_logging(), Err(LoggingError::Install(_))));
}
