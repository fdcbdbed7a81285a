//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::Utc;
use colored::{ColoredString, Colorize};
use log::{self, info};
use std::path::Path;
use thiserror::Error;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string used to timestamp each log line.
const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.6f";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// Lines are written to stdout and, if `log_file` is given, appended to that file.
///
/// # Notes
///
/// - `min_level` must be at least `log::Level::Info`, so that recovered decode conditions
///   (reported at `WARN`) are never silenced.
///
/// # Safety
///
/// - This function must only be called once, a second call returns
///   `LoggerInitError::FernInitError`.
pub fn logger_init<P: AsRef<Path>>(
    min_level: self::LevelFilter,
    log_file: Option<P>,
) -> Result<(), LoggerInitError> {
    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    // Setup the logger using fern's builder pattern
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{} {}] {}: {}",
                    Utc::now().format(TIMESTAMP_FORMAT),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{} {}] {}",
                    Utc::now().format(TIMESTAMP_FORMAT),
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(min_level)
        .chain(std::io::stdout());

    if let Some(ref path) = log_file {
        dispatch = dispatch.chain(match fern::log_file(path.as_ref()) {
            Ok(f) => f,
            Err(e) => return Err(LoggerInitError::LogFileInitError(e)),
        });
    }

    match dispatch.apply() {
        Ok(_) => (),
        Err(e) => return Err(LoggerInitError::FernInitError(e)),
    };

    info!("Logging initialised");
    info!("    Log level: {:?}", min_level);
    if let Some(ref path) = log_file {
        info!("    Log file path: {:?}", path.as_ref());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info => "INF".normal(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold(),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logger_init() {
        // Levels below info are rejected before touching the global logger
        assert!(matches!(
            logger_init::<&str>(LevelFilter::Warn, None),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));

        let log_path = std::env::temp_dir().join("mnvr_util_logger_test.log");
        logger_init(LevelFilter::Debug, Some(&log_path)).unwrap();
        log::warn!("Logger test line");

        // The global logger can only be set once
        assert!(matches!(
            logger_init::<&str>(LevelFilter::Info, None),
            Err(LoggerInitError::FernInitError(_))
        ));

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("Logger test line"));
    }
}
