use crate::{packet::read_packet, Command, Inquiry, Packet, Request, Result};
use binrw::BinWrite;
use std::io::Cursor;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, DuplexStream},
    net::TcpStream,
};

/// Byte streams which may bound each read and write with a deadline.
///
/// [ViscaConnection] calls [reset_deadline][Self::reset_deadline] before it
/// starts each write and each read, so a deadline left armed by an abandoned
/// operation never carries over to the next one.
pub trait Deadline {
    /// Forgets any deadline from a previous operation.
    fn reset_deadline(&mut self) {}
}

impl Deadline for TcpStream {}
impl Deadline for DuplexStream {}

impl<S: Deadline + ?Sized> Deadline for &mut S {
    fn reset_deadline(&mut self) {
        (**self).reset_deadline()
    }
}

/// [ViscaConnection] runs the command / inquiry exchange over a byte stream.
///
/// The stream can be anything which implements [AsyncRead] and [AsyncWrite]:
/// a TCP socket, a serial port, or an in-memory pipe. Reads are buffered
/// internally.
///
/// ## Exchange
///
/// 1. The controller sends a command or inquiry.
/// 2. The camera *may* send any number of ACK messages.
/// 3. The camera sends a completion message (with any reply payload), or an
///    error message.
///
/// ACK messages are consumed by the connection, and never returned. The
/// completion or error message is returned *as-is*: callers must check
/// [Packet::error] (or use [ViscaConnection::inquire]).
///
/// There is no timeout here; wrap the stream in something which enforces one,
/// and implements [Deadline].
pub struct ViscaConnection<S> {
    stream: BufReader<S>,
}

impl<S: AsyncRead + AsyncWrite + Deadline + Unpin> ViscaConnection<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    /// Gets the inner stream, discarding any buffered data.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Sends a command with a command-specific `payload`, and waits for the
    /// camera to complete it.
    pub async fn send_command(&mut self, command: Command, payload: &[u8]) -> Result<Packet> {
        self.send(&Request::command(command, payload)).await
    }

    /// Sends an inquiry, and waits for the camera's reply.
    pub async fn send_inquiry(&mut self, command: Command) -> Result<Packet> {
        self.send(&Request::inquiry(command)).await
    }

    /// Sends the inquiry for `T`, and parses the reply.
    ///
    /// Error messages from the camera are returned as
    /// [Error::Device][crate::Error::Device].
    pub async fn inquire<T: Inquiry>(&mut self) -> Result<T> {
        debug!("inquiry {:02x?}", T::COMMAND.0);
        let packet = self.send_inquiry(T::COMMAND).await?;
        if let Some(e) = packet.error() {
            warn!("camera rejected inquiry {:02x?}: {e}", T::COMMAND.0);
        }
        T::from_packet(&packet)
    }

    async fn send(&mut self, request: &Request) -> Result<Packet> {
        let mut out = Cursor::new(Vec::new());
        request.write(&mut out)?;
        let out = out.into_inner();
        trace!(">>> {}", hex::encode(&out));

        self.stream.get_mut().reset_deadline();
        self.stream.write_all(&out).await?;
        self.stream.flush().await?;
        self.recv().await
    }

    /// Reads messages until one is not an ACK.
    async fn recv(&mut self) -> Result<Packet> {
        loop {
            self.stream.get_mut().reset_deadline();
            let packet = read_packet(&mut self.stream).await?;
            if !packet.is_ack() {
                return Ok(packet);
            }
            trace!("skipping ACK");
        }
    }
}
