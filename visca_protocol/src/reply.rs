//! Typed inquiry replies
//!
//! Each reply structure describes the payload of the completion message sent
//! in response to an inquiry, and is tied to that inquiry's [Command] by the
//! [Inquiry] trait.
//!
//! ## Unimplemented inquiries
//!
//! Inquiry | Opcode
//! ------- | ------
//! `CAM_PowerInq` | `04 00`
//! `CAM_FocusPosInq` | `04 48`
//! `CAM_FocusModeInq` | `04 38`
//! `CAM_WBModeInq` | `04 35`
//! `CAM_MemoryInq` | `04 3f`
//! `CAM_VersionInq` | `00 02`
use crate::{
    util::{nibbles_to_u16, u16_to_nibbles},
    Command, Error, Packet, Result,
};
use binrw::{binrw, BinRead, Endian};
use std::io::Cursor;

/// Reply payload for an inquiry.
pub trait Inquiry: for<'a> BinRead<Args<'a> = ()> {
    /// Opcode to send for this inquiry.
    const COMMAND: Command;

    /// Minimum payload length of the completion message, in bytes.
    const LENGTH: usize;

    /// Parses the reply from a completion [Packet].
    ///
    /// Error and ACK messages are rejected; payload bytes past
    /// [LENGTH][Self::LENGTH] are ignored.
    fn from_packet(packet: &Packet) -> Result<Self> {
        if let Some(e) = packet.error() {
            return Err(e.into());
        }

        if !packet.is_completion() {
            return Err(Error::UnexpectedReply(packet.as_bytes()[1]));
        }

        let payload = packet.payload();
        if payload.len() < Self::LENGTH {
            error!(
                "reply payload too short: {} < {}",
                payload.len(),
                Self::LENGTH
            );
            return Err(Error::InvalidLength);
        }

        Ok(Self::read_options(
            &mut Cursor::new(payload),
            Endian::Big,
            (),
        )?)
    }
}

/// `CAM_ZoomPosInq` reply
///
/// ## Packet format
///
/// * `[u8; 4]`: zoom position, nibble-encoded
#[binrw]
#[brw(big)]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ZoomPosition {
    #[br(map = nibbles_to_u16)]
    #[bw(map = |v: &u16| u16_to_nibbles(*v))]
    pub zoom: u16,
}

impl Inquiry for ZoomPosition {
    const COMMAND: Command = Command::ZOOM_POSITION_INQUIRY;
    const LENGTH: usize = 4;
}

/// `Pan-tiltPosInq` reply
///
/// ## Packet format
///
/// * `[u8; 4]`: pan position, nibble-encoded
/// * `[u8; 4]`: tilt position, nibble-encoded
#[binrw]
#[brw(big)]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PanTiltPosition {
    #[br(map = nibbles_to_u16)]
    #[bw(map = |v: &u16| u16_to_nibbles(*v))]
    pub pan: u16,

    #[br(map = nibbles_to_u16)]
    #[bw(map = |v: &u16| u16_to_nibbles(*v))]
    pub tilt: u16,
}

impl Inquiry for PanTiltPosition {
    const COMMAND: Command = Command::PAN_TILT_POSITION_INQUIRY;
    const LENGTH: usize = 8;
}
