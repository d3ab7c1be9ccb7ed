#![doc = include_str!("../README.md")]

#[macro_use]
extern crate tracing;

mod camera;
mod error;
pub mod transport;

pub use {
    crate::{
        camera::{
            query_position, Camera, Position, ALTERNATE_PORT, DEFAULT_PORT, DEFAULT_TIMEOUT,
        },
        error::Error,
        transport::DeadlineStream,
    },
    visca_protocol as protocol,
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
