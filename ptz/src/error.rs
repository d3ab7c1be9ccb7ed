use std::io::{Error as IoError, ErrorKind};
use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error(transparent)]
    IoError(#[from] IoError),

    #[error(transparent)]
    Protocol(crate::protocol::Error),

    #[error("timeout waiting for camera")]
    Timeout,

    #[error("invalid camera address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Returns `true` if an operation did not complete before its deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::IoError(e) => e.kind() == ErrorKind::TimedOut,
            Self::Protocol(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl From<crate::protocol::Error> for Error {
    fn from(e: crate::protocol::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Protocol(e)
        }
    }
}
