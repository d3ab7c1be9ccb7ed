//! Outgoing commands and inquiries
//!
//! ## Packet format
//!
//! * `u8`: header, `0x80 | camera address` (always camera 1)
//! * `u8`: message type ([MessageType])
//! * `[u8; 2]`: opcode ([Command])
//! * command-specific payload (commands only)
//! * `u8`: terminator, `0xff`
use binrw::binrw;

/// Header byte for messages sent from the controller to camera 1.
pub const HEADER: u8 = 0x81;

/// Terminates every message.
pub const TERMINATOR: u8 = 0xff;

/// Message type, found in the low nibble of the second byte.
#[binrw]
#[brw(big, repr = u8)]
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// A command which changes camera state.
    Command = 0x01,
    /// A read-only request for camera state.
    Inquiry = 0x09,
}

/// VISCA operation opcode.
#[binrw]
#[brw(big)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Command(pub [u8; 2]);

impl Command {
    /// `CAM_ZoomPosInq`
    pub const ZOOM_POSITION_INQUIRY: Self = Self([0x04, 0x47]);

    /// `Pan-tiltPosInq`
    pub const PAN_TILT_POSITION_INQUIRY: Self = Self([0x06, 0x12]);
}

/// A framed message to send to the camera.
#[binrw::binwrite]
#[bw(big, magic = 0x81u8)]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Request {
    pub typ: MessageType,
    pub command: Command,
    pub payload: Vec<u8>,
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

impl Request {
    /// Makes a command [Request], with a command-specific `payload`.
    pub fn command(command: Command, payload: &[u8]) -> Self {
        Self {
            typ: MessageType::Command,
            command,
            payload: payload.to_vec(),
        }
    }

    /// Makes an inquiry [Request].
    pub fn inquiry(command: Command) -> Self {
        Self {
            typ: MessageType::Inquiry,
            command,
            payload: Vec::new(),
        }
    }
}
