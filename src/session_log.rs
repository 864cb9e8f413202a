//! Per-session text log
//!
//! Human-readable trace of a session ("Understood: …", "Question: …",
//! "Answer: …") plus the matcher's distance table. Written to
//! `log_%H_%M_%S.txt` in the configured log directory.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::Result;

/// Append-only session log
///
/// A file-backed log only appends to its file. An in-memory log keeps its
/// lines so callers can inspect the trace.
#[derive(Debug)]
pub struct SessionLog {
    path: Option<PathBuf>,
    inner: Mutex<LogInner>,
}

#[derive(Debug)]
struct LogInner {
    file: Option<File>,
    /// Retained lines, for in-memory logs only
    lines: Option<Vec<String>>,
}

impl SessionLog {
    /// Create a new log file named after the current time in `dir`
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Local::now().format("log_%H_%M_%S.txt").to_string());
        Self::open(&path)
    }

    /// Open (or create) a log at an explicit path, appending
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!(path = %path.display(), "session log opened");

        Ok(Self {
            path: Some(path.to_path_buf()),
            inner: Mutex::new(LogInner {
                file: Some(file),
                lines: None,
            }),
        })
    }

    /// Log kept only in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: Mutex::new(LogInner {
                file: None,
                lines: Some(Vec::new()),
            }),
        }
    }

    /// Append a timestamped entry
    pub fn log(&self, text: &str) {
        self.append(text, true);
    }

    /// Append an entry without the timestamp prefix
    pub fn log_plain(&self, text: &str) {
        self.append(text, false);
    }

    /// Append an entry, optionally prefixed with `[%H:%M:%S]`
    ///
    /// Write failures are reported through tracing and otherwise ignored.
    pub fn append(&self, text: &str, show_time: bool) {
        let line = if show_time {
            format!("{} {text}", Local::now().format("[%H:%M:%S]"))
        } else {
            text.to_string()
        };

        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(file) = inner.file.as_mut() {
            if let Err(e) = writeln!(file, "{line}") {
                tracing::warn!(error = %e, "failed to write session log");
            }
        }
        if let Some(lines) = inner.lines.as_mut() {
            lines.push(line);
        }
    }

    /// Snapshot of every line written so far; always empty for a
    /// file-backed log
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.lines.clone().unwrap_or_default()
    }

    /// Path of the backing file, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
