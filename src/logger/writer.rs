//! Log writer module
//!
//! Thread-safe sinks for the two log streams: info (invocations, lifecycle,
//! access lines) and error (warnings, failures). Each goes to a file when a
//! path is configured, otherwise to stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => open_log_file(p).map(Self::File),
            None => Ok(fallback),
        }
    }

    fn write_line(&mut self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
            Self::File(file) => {
                // A failing log sink must not take a request down with it
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    info: Mutex<LogTarget>,
    error: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(info_file: Option<&str>, error_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            info: Mutex::new(LogTarget::open(info_file, LogTarget::Stdout)?),
            error: Mutex::new(LogTarget::open(error_file, LogTarget::Stderr)?),
        })
    }

    /// Timestamped line on the info stream
    pub fn write_info(&self, message: &str) {
        let line = stamp(message);
        lock(&self.info).write_line(&line);
    }

    /// Timestamped line on the error stream
    pub fn write_error(&self, message: &str) {
        let line = stamp(message);
        lock(&self.error).write_line(&line);
    }

    /// Access lines carry their own timestamp format
    pub fn write_access(&self, message: &str) {
        lock(&self.info).write_line(message);
    }
}

fn lock(target: &Mutex<LogTarget>) -> std::sync::MutexGuard<'_, LogTarget> {
    target.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Prefix a message with an RFC 3339 local timestamp
pub fn stamp(message: &str) -> String {
    format!(
        "{} {message}",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
    )
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Global writer, if `init` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
