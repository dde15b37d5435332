use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// SSH-related errors
#[derive(Error, Debug)]
pub enum SshError {
    #[error("Key file error: {0}")]
    KeyFile(String),

    #[error("Credential record stream closed")]
    RecordStreamClosed,

    #[error("russh error: {0}")]
    Russh(String),
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Russh(err.to_string())
    }
}

/// Errors that stop the process before it starts serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{0}")]
    InvalidPorts(#[from] ValidationError),

    #[error("Could not load host key {path}: {source}")]
    HostKey { path: PathBuf, source: SshError },

    #[error("Could not open output file '{path}': {source}")]
    OutputFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Fatal : No server bound")]
    NoListenerBound,
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::InvalidPorts(_) => 1,
            StartupError::HostKey { .. } => 2,
            StartupError::OutputFile { .. } => 3,
            StartupError::NoListenerBound => 4,
        }
    }
}
