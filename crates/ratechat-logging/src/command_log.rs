//! Append-only log of executed exchange commands.
//!
//! Each attempted `exchange` command produces one line:
//!
//! ```text
//! 2026-10-17 14:03:59 - Exchange command executed: exchange 3 GBP
//! ```
//!
//! The log is write-only; nothing in the relay reads it back.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;

/// Timestamp layout used in each log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One executed command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRecord {
    /// When the command was received (local time).
    pub timestamp: DateTime<Local>,
    /// The raw command text as sent by the client.
    pub command: String,
}

impl CommandRecord {
    /// Record `command` with the current local time.
    pub fn now(command: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            command: command.into(),
        }
    }
}

/// Renders as one log line; `\r` and `\n` in the command are escaped.
impl fmt::Display for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Exchange command executed: ",
            self.timestamp.format(TIMESTAMP_FORMAT)
        )?;
        for c in self.command.chars() {
            match c {
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                c => fmt::Write::write_char(f, c)?,
            }
        }
        Ok(())
    }
}

/// Sink for executed exchange commands.
#[async_trait]
pub trait CommandLog: Send + Sync {
    /// Append one record.
    async fn record(&self, record: &CommandRecord) -> io::Result<()>;
}

/// Appends records to a file, creating it on first write.
#[derive(Clone, Debug)]
pub struct FileCommandLog {
    path: PathBuf,
}

impl FileCommandLog {
    /// Log to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CommandLog for FileCommandLog {
    async fn record(&self, record: &CommandRecord) -> io::Result<()> {
        let line = format!("{record}\n");
        // One write_all per line; O_APPEND keeps concurrent lines whole.
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// In-memory log, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryCommandLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryCommandLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

#[async_trait]
impl CommandLog for MemoryCommandLog {
    async fn record(&self, record: &CommandRecord) -> io::Result<()> {
        self.lines.lock().push(record.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed(command: &str) -> CommandRecord {
        CommandRecord {
            timestamp: Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap(),
            command: command.to_string(),
        }
    }

    #[test]
    fn line_format() {
        assert_eq!(
            fixed("exchange 2 PLN").to_string(),
            "2026-03-09 07:05:01 - Exchange command executed: exchange 2 PLN"
        );
    }

    #[test]
    fn line_breaks_are_escaped() {
        let forged = "exchange\r\n2026-01-01 00:00:00 - Exchange command executed: x";
        let line = fixed(forged).to_string();
        assert_eq!(line.lines().count(), 1);
        assert!(line.ends_with(
            "executed: exchange\\r\\n2026-01-01 00:00:00 - Exchange command executed: x"
        ));
    }

    #[tokio::test]
    async fn file_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange_logs.txt");
        let log = FileCommandLog::new(&path);

        log.record(&fixed("exchange")).await.unwrap();
        log.record(&fixed("exchange 3 GBP")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Exchange command executed: exchange"));
        assert!(lines[1].ends_with("Exchange command executed: exchange 3 GBP"));
    }

    #[tokio::test]
    async fn file_log_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "earlier\n").unwrap();

        FileCommandLog::new(&path)
            .record(&fixed("exchange 1"))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("earlier\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn file_log_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileCommandLog::new(dir.path().join("missing").join("log.txt"));
        assert!(log.record(&fixed("exchange")).await.is_err());
    }

    #[tokio::test]
    async fn memory_log_collects() {
        let log = MemoryCommandLog::new();
        log.record(&fixed("exchange 5")).await.unwrap();
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].contains("exchange 5"));
    }
}
