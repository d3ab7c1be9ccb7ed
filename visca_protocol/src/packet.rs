use crate::{
    command::{MessageType, TERMINATOR},
    util::decode_nibbles,
    DeviceError, Error, Result,
};
use num_traits::FromPrimitive;
use std::io::{Error as IoError, ErrorKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Message class, found in the high nibble of the second byte.
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum MessageClass {
    /// The camera accepted a command, but has not yet completed it.
    Ack = 0x4,
    /// The command completed, or an inquiry reply.
    Completion = 0x5,
    /// The command or inquiry failed; see [Packet::error].
    Error = 0x6,
}

/// [Packet] is a single terminator-delimited VISCA message received from a
/// camera.
///
/// A [Packet] can only be made by [reading a complete frame][read_packet]
/// from a stream, and is always at least [Packet::MIN_LENGTH] bytes long.
///
/// ## Packet format
///
/// * `u8`: header
/// * `u8`: [message class][MessageClass] (high nibble) and
///   [message type][MessageType] or socket number (low nibble)
/// * payload (0 or more bytes)
/// * `u8`: terminator, `0xff`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(Vec<u8>);

impl Packet {
    /// Header, class byte and terminator.
    pub const MIN_LENGTH: usize = 3;

    /// Makes a [Packet] from a frame read from a stream, which must include
    /// the terminator.
    pub(crate) fn from_frame(frame: Vec<u8>) -> Result<Self> {
        if frame.last() != Some(&TERMINATOR) {
            return Err(IoError::new(
                ErrorKind::UnexpectedEof,
                "stream ended before frame terminator",
            )
            .into());
        }

        if frame.len() < Self::MIN_LENGTH {
            error!("frame too short: {}", hex::encode(&frame));
            return Err(Error::InvalidLength);
        }

        Ok(Self(frame))
    }

    pub fn header(&self) -> u8 {
        self.0[0]
    }

    fn class_byte(&self) -> u8 {
        self.0[1]
    }

    pub fn message_class(&self) -> Option<MessageClass> {
        MessageClass::from_u8(self.class_byte() >> 4)
    }

    /// Message type, from the low nibble of the class byte.
    ///
    /// This is only meaningful on frames sent *to* a camera. On replies, the
    /// low nibble is a socket number, so `9051ff` (completion on socket 1)
    /// reports [MessageType::Command].
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u8(self.class_byte() & 0x0f)
    }

    pub fn is_ack(&self) -> bool {
        self.message_class() == Some(MessageClass::Ack)
    }

    pub fn is_completion(&self) -> bool {
        self.message_class() == Some(MessageClass::Completion)
    }

    pub fn is_error(&self) -> bool {
        self.message_class() == Some(MessageClass::Error)
    }

    /// The bytes between the class byte and the terminator.
    pub fn payload(&self) -> &[u8] {
        &self.0[2..self.0.len() - 1]
    }

    /// Length of the entire frame, including the header and terminator.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes a nibble-encoded value of `width` bytes, starting `offset`
    /// bytes into the [payload][Self::payload].
    ///
    /// ## Panics
    ///
    /// If `offset + width` is past the end of the payload, or `width` is
    /// greater than 8.
    pub fn value(&self, offset: usize, width: usize) -> u32 {
        decode_nibbles(&self.payload()[offset..offset + width])
    }

    /// If this is an error-class packet, gets the [DeviceError] reported by
    /// the camera.
    ///
    /// Otherwise returns [None].
    pub fn error(&self) -> Option<DeviceError> {
        if self.is_error() {
            // byte 2 is the terminator on a bare `y0 6z ff`, which is unknown.
            Some(DeviceError::from_code(self.0[2]))
        } else {
            None
        }
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reads a single [Packet] from `reader`, up to and including the next
/// terminator.
///
/// If the stream ends before a terminator is seen, this returns an
/// [ErrorKind::UnexpectedEof] I/O error, and the partial frame is discarded.
pub async fn read_packet<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Packet> {
    let mut frame = Vec::new();
    reader.read_until(TERMINATOR, &mut frame).await?;
    let packet = Packet::from_frame(frame)?;
    trace!("<<< {}", hex::encode(&packet));
    Ok(packet)
}
