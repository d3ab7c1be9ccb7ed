//! Camera-reported error codes
//!
//! Error replies take the form `y0 6z ee ff`, where `z` is the socket number
//! and `ee` is one of the codes below.
//!
//! Code | Error
//! ---- | -----
//! `01` | Message length error
//! `02` | Syntax error
//! `03` | Command buffer full
//! `04` | Command canceled
//! `05` | No socket (to be canceled)
//! `41` | Command not executable
//!
//! Some older firmware reports "not executable" as `06`, and omits the message
//! length error. Those codes are *not* merged in here, and surface as
//! [DeviceError::Unknown].
use thiserror::Error;

/// Error condition reported by the camera in an error-class reply.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceError {
    #[error("incorrect message length")]
    MessageLength,

    #[error("syntax error")]
    Syntax,

    #[error("command buffer full")]
    BufferFull,

    #[error("command canceled")]
    Canceled,

    #[error("cancel failed (no socket)")]
    NoSocket,

    #[error("cannot execute command")]
    NotExecutable,

    /// An error code not in the table. The raw code is kept.
    #[error("unknown error {0:#04x}")]
    Unknown(u8),
}

impl DeviceError {
    pub const MESSAGE_LENGTH: u8 = 0x01;
    pub const SYNTAX: u8 = 0x02;
    pub const BUFFER_FULL: u8 = 0x03;
    pub const CANCELED: u8 = 0x04;
    pub const NO_SOCKET: u8 = 0x05;
    pub const NOT_EXECUTABLE: u8 = 0x41;

    /// Maps an error code to its condition.
    ///
    /// Unrecognised codes map to [DeviceError::Unknown], never to "no error".
    pub const fn from_code(code: u8) -> Self {
        use DeviceError::*;
        match code {
            Self::MESSAGE_LENGTH => MessageLength,
            Self::SYNTAX => Syntax,
            Self::BUFFER_FULL => BufferFull,
            Self::CANCELED => Canceled,
            Self::NO_SOCKET => NoSocket,
            Self::NOT_EXECUTABLE => NotExecutable,
            code => Unknown(code),
        }
    }

    /// The wire code for this condition.
    pub const fn code(&self) -> u8 {
        use DeviceError::*;
        match self {
            MessageLength => Self::MESSAGE_LENGTH,
            Syntax => Self::SYNTAX,
            BufferFull => Self::BUFFER_FULL,
            Canceled => Self::CANCELED,
            NoSocket => Self::NO_SOCKET,
            NotExecutable => Self::NOT_EXECUTABLE,
            Unknown(code) => *code,
        }
    }
}

impl From<u8> for DeviceError {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code_table() {
        let expected = [
            (0x01, DeviceError::MessageLength),
            (0x02, DeviceError::Syntax),
            (0x03, DeviceError::BufferFull),
            (0x04, DeviceError::Canceled),
            (0x05, DeviceError::NoSocket),
            (0x41, DeviceError::NotExecutable),
        ];

        for (code, err) in expected {
            assert_eq!(err, DeviceError::from_code(code));
            assert_eq!(code, err.code());
        }
    }

    #[test]
    fn unknown_codes() {
        for code in [0x00, 0x06, 0x40, 0x42, 0xff] {
            assert_eq!(DeviceError::Unknown(code), DeviceError::from(code));
            assert_eq!(code, DeviceError::from(code).code());
        }
    }
}
