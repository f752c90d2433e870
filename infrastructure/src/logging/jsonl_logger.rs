//! JSONL turn log.
//!
//! Every [`TurnRecord`] becomes one line: the record's own fields, its
//! `type` tag and a millisecond `timestamp`. The file is opened in append
//! mode so restarts extend the same transcript.

use chrono::{SecondsFormat, Utc};
use relay_application::{ConversationLogger, TurnRecord};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    record: &'a TurnRecord,
}

pub struct JsonlConversationLogger {
    writer: Mutex<LineWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the log, creating missing parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(LineWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&self, record: &TurnRecord) -> io::Result<()> {
        let line = LogLine {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            record,
        };
        let mut bytes = serde_json::to_vec(&line)?;
        bytes.push(b'\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("turn log writer poisoned"))?;
        writer.write_all(&bytes)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, record: TurnRecord) {
        if let Err(e) = self.write_record(&record) {
            warn!(
                path = %self.path.display(),
                conversation_id = %record.conversation_id(),
                error = %e,
                "Could not write turn record"
            );
        }
    }
}
