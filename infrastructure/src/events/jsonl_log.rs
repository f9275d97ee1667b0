//! JSONL file writer for session events.
//!
//! Each [`SessionEvent`] is serialized as a single JSON line with `type`,
//! `session` and `timestamp` fields, appended via a buffered writer.

use plenum_application::ports::{EventSink, SessionEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only event log, one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every record and
/// on `Drop`; a write failure is logged and the command proceeds.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Open the log for appending, creating the file (and parent
    /// directories) as needed. Returns `None` if the file cannot be
    /// opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create event log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlEventLog {
    fn record(&self, event: SessionEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge the payload with type, session and timestamp.
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "session".to_string(),
                serde_json::Value::String(event.session_id.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "session": event.session_id,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
