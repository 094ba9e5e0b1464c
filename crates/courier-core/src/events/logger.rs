//! Notification Logger
//!
//! Append-only JSONL notification logging.

use courier_events::LoggedNotification;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Writes logged notifications to a JSONL file, one per line.
pub struct NotificationLogger {
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl NotificationLogger {
    /// Create a logger writing to the specified path, truncating it.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            written: 0,
        })
    }

    /// Create a logger that discards everything.
    pub fn null() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    /// Number of notifications passed to the logger.
    pub fn count(&self) -> u64 {
        self.written
    }

    pub fn log(&mut self, entry: &LoggedNotification) -> std::io::Result<()> {
        self.written += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, entries: &[LoggedNotification]) -> std::io::Result<()> {
        for entry in entries {
            self.log(entry)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for NotificationLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationLogger")
            .field("to_file", &self.writer.is_some())
            .field("written", &self.written)
            .finish()
    }
}

impl Drop for NotificationLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to flush notification logger: {}", e);
        }
    }
}
