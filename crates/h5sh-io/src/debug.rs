//! Debug logging to a file
//!
//! The terminal is in raw mode while a line is being edited, so log output
//! cannot go to stderr. When `H5SH_DEBUG` is set to `1` or `true`, records from
//! the `log` facade are appended to a file instead.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

pub const ENV_ENABLE_LOG: &str = "H5SH_DEBUG";

/// `tmp/h5sh-debug.log` when run from a directory with a `tmp/`, otherwise
/// `/tmp/h5sh-debug.log`.
pub fn default_log_path() -> PathBuf {
    if Path::new("tmp").exists() {
        PathBuf::from("tmp/h5sh-debug.log")
    } else {
        PathBuf::from("/tmp/h5sh-debug.log")
    }
}

pub fn debug_enabled() -> bool {
    std::env::var(ENV_ENABLE_LOG)
        .map(|val| val == "true" || val == "1")
        .unwrap_or(false)
}

/// A `log::Log` appending one line per record to a file.
pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = writeln!(
                file,
                "[{timestamp}] {} {}: {}",
                record.level(),
                record.target(),
                record.args()
            ) {
                eprintln!("Failed to write to debug log: {e}");
            } else {
                let _ = file.flush(); // Immediately flush
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the file logger.
///
/// An explicit `path` always enables logging. Without one, logging is only
/// enabled through `H5SH_DEBUG`. Returns the log file path when a logger was
/// installed.
pub fn init(path: Option<&Path>) -> Option<PathBuf> {
    let log_path = match path {
        Some(path) => path.to_path_buf(),
        None if debug_enabled() => default_log_path(),
        None => return None,
    };

    let logger = match FileLogger::open(&log_path, LevelFilter::Trace) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to open debug log file {}: {e}", log_path.display());
            return None;
        }
    };

    if log::set_boxed_logger(Box::new(logger)).is_err() {
        return None;
    }
    log::set_max_level(LevelFilter::Trace);
    eprintln!("h5sh debug log enabled: {}", log_path.display());
    Some(log_path)
}
