#![doc = include_str!("../README.md")]

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate tracing;

mod command;
mod connection;
mod device_error;
mod error;
mod packet;
pub mod reply;
mod util;

pub use crate::{
    command::{Command, MessageType, Request, HEADER, TERMINATOR},
    connection::{Deadline, ViscaConnection},
    device_error::DeviceError,
    error::Error,
    packet::{read_packet, MessageClass, Packet},
    reply::Inquiry,
    util::{decode_nibbles, encode_nibbles},
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
