use crate::{
    protocol::{
        reply::{PanTiltPosition, ZoomPosition},
        Deadline, ViscaConnection,
    },
    transport::{connect, DeadlineStream},
    Error, Result,
};
use std::{
    fmt::Display,
    net::{IpAddr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

/// Default TCP port for VISCA over IP.
pub const DEFAULT_PORT: u16 = 5678;

/// TCP port used by some other VISCA over IP implementations.
pub const ALTERNATE_PORT: u16 = 1259;

/// Default timeout for connecting, and for each read or write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Camera pan, tilt and zoom positions, in the camera's native units.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub pan: u16,
    pub tilt: u16,
    pub zoom: u16,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pan={:#06x} tilt={:#06x} zoom={:#06x}",
            self.pan, self.tilt, self.zoom
        )
    }
}

/// [Camera] is a VISCA over IP camera.
///
/// This doesn't hold a connection open; each [query][Self::query] makes a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    host: String,
    port: u16,
    timeout: Duration,
}

impl Camera {
    /// Makes a [Camera] at `host`, with the [default port][DEFAULT_PORT] and
    /// [timeout][DEFAULT_TIMEOUT].
    ///
    /// `host` may be a hostname, an IP address, or either of those with a port
    /// (which overrides [Camera::with_port]).
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Socket address to connect to, as `host:port`.
    pub fn addr(&self) -> Result<String> {
        let host = self.host.trim();
        let invalid = || Error::InvalidAddress(self.host.clone());

        if host.is_empty() {
            return Err(invalid());
        }

        if host.parse::<SocketAddr>().is_ok() {
            return Ok(host.to_string());
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port).to_string());
        }

        if let Some(ip) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            let ip: Ipv6Addr = ip.parse().map_err(|_| invalid())?;
            return Ok(SocketAddr::new(ip.into(), self.port).to_string());
        }

        match host.rsplit_once(':') {
            None => Ok(format!("{host}:{}", self.port)),
            Some((name, port)) if !name.is_empty() && !name.contains(':') => {
                port.parse::<u16>().map_err(|_| invalid())?;
                Ok(host.to_string())
            }
            Some(_) => Err(invalid()),
        }
    }

    /// Opens a new connection to the camera.
    pub async fn connect(&self) -> Result<ViscaConnection<DeadlineStream<TcpStream>>> {
        let addr = self.addr()?;
        debug!("connecting to {addr}, timeout {:?}", self.timeout);
        let stream = connect(addr, self.timeout).await?;
        Ok(ViscaConnection::new(stream))
    }

    /// Connects to the camera, and gets its current [Position].
    pub async fn query(&self) -> Result<Position> {
        let mut conn = self.connect().await?;
        query_position(&mut conn).await
    }
}

/// Gets the current [Position] of the camera on `conn`.
///
/// This sends the zoom position inquiry, and only if that succeeds, the
/// pan/tilt position inquiry. Nothing is returned unless both succeed.
pub async fn query_position<S: AsyncRead + AsyncWrite + Deadline + Unpin>(
    conn: &mut ViscaConnection<S>,
) -> Result<Position> {
    let ZoomPosition { zoom } = conn.inquire::<ZoomPosition>().await?;
    let PanTiltPosition { pan, tilt } = conn.inquire::<PanTiltPosition>().await?;
    let position = Position { pan, tilt, zoom };
    debug!("camera position: {position}");
    Ok(position)
}
