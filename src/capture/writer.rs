//! The single consumer of the record stream.
//!
//! Only this task writes to the output file, so lines from concurrent
//! connections never interleave and no file locking is needed.

use std::path::Path;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::CredentialRecord;

/// Open the output file for appending, creating it if needed.
pub async fn open_output(path: &Path) -> std::io::Result<tokio::fs::File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o644);
    options.open(path).await
}

/// Appends each received record to `sink` as one line.
pub struct RecordWriter<W> {
    sink: W,
    written: u64,
}

impl<W: AsyncWrite + Unpin> RecordWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Drain `receiver` until every sender is gone.
    ///
    /// Each record is written and flushed before the next one is taken.
    /// A failed write is reported and the loop moves on. Returns the number
    /// of records written.
    pub async fn run(&mut self, mut receiver: mpsc::Receiver<CredentialRecord>) -> u64 {
        while let Some(record) = receiver.recv().await {
            if let Err(error) = self.write_record(&record).await {
                tracing::error!(
                    "Failed writing credential record from {}: {}",
                    record.remote_host,
                    error
                );
            }
        }

        let _ = self.sink.flush().await;
        tracing::debug!("Record stream closed after {} records", self.written);
        self.written
    }

    async fn write_record(&mut self, record: &CredentialRecord) -> std::io::Result<()> {
        let mut line = record.to_line();
        line.push('\n');
        self.sink.write_all(line.as_bytes()).await?;
        self.sink.flush().await?;
        self.written += 1;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
