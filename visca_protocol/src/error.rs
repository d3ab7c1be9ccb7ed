use crate::DeviceError;
use std::io::{Error as IoError, ErrorKind};
use thiserror::Error;

/// Error types.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid length")]
    InvalidLength,

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),

    #[error("camera reported error: {0}")]
    Device(#[from] DeviceError),

    #[error("unexpected reply message class: {0:#04x}")]
    UnexpectedReply(u8),
}

impl Error {
    /// Returns `true` if this error was caused by an I/O operation exceeding
    /// its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == ErrorKind::TimedOut)
    }
}
