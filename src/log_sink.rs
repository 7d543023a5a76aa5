//! Append-only request/error log.
//!
//! Callers never wait on the file: lines are queued to a single background
//! task that appends them in the order they were logged.

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

enum LogCommand {
    Line(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background log writer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
    tx: mpsc::UnboundedSender<LogCommand>,
}

impl LogSink {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let join_handle = tokio::spawn(run_writer(path.clone(), rx));
        (Self { path, tx }, join_handle)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queues `<timestamp> - <message>` for appending.
    pub fn log(&self, message: impl AsRef<str>) {
        let line = format_line(Utc::now(), message.as_ref());
        if self.tx.send(LogCommand::Line(line)).is_err() {
            error!(path = %self.path.display(), "log writer stopped; dropping log line");
        }
    }

    /// Resolves once every line queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(LogCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn format_line(at: DateTime<Utc>, message: &str) -> String {
    format!(
        "{} - {}\n",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        message
    )
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<LogCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            LogCommand::Line(line) => {
                if let Err(err) = append_line(&path, &line).await {
                    error!(path = %path.display(), error = %err, "failed to write log");
                }
            }
            LogCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn line_uses_millisecond_zulu_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(
            format_line(at, "GET /todos"),
            "2024-05-01T09:30:00.000Z - GET /todos\n"
        );
    }
}
