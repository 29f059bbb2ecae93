//! JSONL file writer for usage events.
//!
//! Each [`UsageEvent`] is serialized as a single JSON line with its `event`
//! tag and a `timestamp`, appended to the file via a buffered writer.

use quorum_application::ports::usage::{UsageEvent, UsageObserver};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL usage logger that appends one JSON object per event.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlUsageLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlUsageLogger {
    /// Open (or create) the log at the given path in append mode.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create usage log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open usage log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageObserver for JsonlUsageLogger {
    fn record(&self, event: &UsageEvent) {
        let Ok(serde_json::Value::Object(mut record)) = serde_json::to_value(event) else {
            return;
        };
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush per line; a crash should lose at most the event in flight
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlUsageLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
