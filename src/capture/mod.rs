//! Credential capture: the records produced by the authentication hook and
//! the single task that appends them to the output file.

pub mod record;
pub mod writer;

pub use record::CredentialRecord;
pub use writer::{RecordWriter, open_output};

use tokio::sync::mpsc;

/// Create the shared record stream.
///
/// Producers block once `capacity` records are waiting for the writer.
/// A capacity of zero is raised to one.
pub fn record_channel(
    capacity: usize,
) -> (mpsc::Sender<CredentialRecord>, mpsc::Receiver<CredentialRecord>) {
    mpsc::channel(capacity.max(1))
}
