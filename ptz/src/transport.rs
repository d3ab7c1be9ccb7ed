//! Transport layer for VISCA over IP.
//!
//! Cameras typically listen for VISCA on TCP port 5678; some use 1259.
//!
//! VISCA has no keep-alive, and a camera which stops responding will leave a
//! reader waiting forever. [DeadlineStream] bounds every individual read and
//! write instead.
use crate::{protocol::Deadline, Error, Result};
use std::{
    future::Future,
    io::{Error as IoError, ErrorKind},
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::{TcpStream, ToSocketAddrs},
    time::{sleep, timeout, Sleep},
};

/// Wrapper for byte streams which fails any read or write that does not
/// complete within `timeout`.
///
/// The deadline is (re)set at the start of each operation, not over the life
/// of the stream, so an idle connection never times out by itself. It starts
/// when an operation first has to wait, and ends when that operation completes
/// or [Deadline::reset_deadline] is called. A caller which gives up on a
/// pending operation must reset the deadline before starting the next one;
/// [ViscaConnection][crate::protocol::ViscaConnection] does this itself.
///
/// Expired operations fail with [ErrorKind::TimedOut].
pub struct DeadlineStream<S> {
    inner: S,
    timeout: Duration,
    read_deadline: Option<Pin<Box<Sleep>>>,
    write_deadline: Option<Pin<Box<Sleep>>>,
}

impl<S> DeadlineStream<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            read_deadline: None,
            write_deadline: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> Deadline for DeadlineStream<S> {
    fn reset_deadline(&mut self) {
        self.read_deadline = None;
        self.write_deadline = None;
    }
}

/// Polls the deadline for a pending operation, starting it if needed.
///
/// Ready when the deadline has passed.
fn poll_deadline(
    deadline: &mut Option<Pin<Box<Sleep>>>,
    timeout: Duration,
    op: &str,
    cx: &mut Context<'_>,
) -> Poll<IoError> {
    let timer = deadline.get_or_insert_with(|| Box::pin(sleep(timeout)));
    match timer.as_mut().poll(cx) {
        Poll::Ready(()) => {
            *deadline = None;
            debug!("{op} timed out after {timeout:?}");
            Poll::Ready(IoError::new(
                ErrorKind::TimedOut,
                format!("{op} timed out after {timeout:?}"),
            ))
        }
        Poll::Pending => Poll::Pending,
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for DeadlineStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(r) => {
                this.read_deadline = None;
                Poll::Ready(r)
            }
            Poll::Pending => {
                poll_deadline(&mut this.read_deadline, this.timeout, "read", cx).map(Err)
            }
        }
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for DeadlineStream<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(r) => {
                this.write_deadline = None;
                Poll::Ready(r)
            }
            Poll::Pending => {
                poll_deadline(&mut this.write_deadline, this.timeout, "write", cx).map(Err)
            }
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_flush(cx) {
            Poll::Ready(r) => {
                this.write_deadline = None;
                Poll::Ready(r)
            }
            Poll::Pending => {
                poll_deadline(&mut this.write_deadline, this.timeout, "flush", cx).map(Err)
            }
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Connects to a camera over TCP.
///
/// `timeout_duration` applies to establishing the connection, and then to each
/// read and write on the returned stream.
pub async fn connect<A: ToSocketAddrs>(
    addr: A,
    timeout_duration: Duration,
) -> Result<DeadlineStream<TcpStream>> {
    let stream = timeout(timeout_duration, TcpStream::connect(addr))
        .await
        .map_err(|_| Error::Timeout)??;
    stream.set_nodelay(true)?;
    if let Ok(peer) = stream.peer_addr() {
        debug!("connected to {peer}");
    }
    Ok(DeadlineStream::new(stream, timeout_duration))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::{Command, ViscaConnection};
    use tokio::{
        io::{duplex, AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn read_timeout() {
        let (client, _camera) = duplex(16);
        let mut client = DeadlineStream::new(client, SHORT);
        let mut b = [0; 1];
        let e = client.read(&mut b).await.unwrap_err();
        assert_eq!(ErrorKind::TimedOut, e.kind());
    }

    #[tokio::test]
    async fn write_timeout() {
        // Nobody reads the other end, so the buffer fills.
        let (client, _camera) = duplex(4);
        let mut client = DeadlineStream::new(client, SHORT);
        let e = client.write_all(&[0; 16]).await.unwrap_err();
        assert_eq!(ErrorKind::TimedOut, e.kind());
    }

    #[tokio::test]
    async fn deadline_is_per_operation() -> Result {
        let (client, mut camera) = duplex(16);
        let mut client = DeadlineStream::new(client, Duration::from_millis(250));

        // Each byte arrives well inside the timeout, but all of them together
        // take longer than it.
        let writer = tokio::spawn(async move {
            for i in 0..4u8 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                camera.write_all(&[i]).await.unwrap();
            }
            camera
        });

        let mut b = [0; 1];
        for i in 0..4u8 {
            client.read_exact(&mut b).await?;
            assert_eq!([i], b);
        }
        writer.await.unwrap();
        Ok(())
    }

    #[tokio::test]
    async fn reset_after_abandoned_read() -> Result {
        let (client, mut camera) = duplex(16);
        let mut client = DeadlineStream::new(client, Duration::from_millis(300));
        let mut b = [0; 1];

        // Give up on a read part way to its deadline.
        assert!(timeout(Duration::from_millis(250), client.read(&mut b))
            .await
            .is_err());
        client.reset_deadline();

        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            camera.write_all(&[0x90]).await.unwrap();
            camera
        });
        client.read_exact(&mut b).await?;
        assert_eq!([0x90], b);
        writer.await.unwrap();
        Ok(())
    }

    #[tokio::test]
    async fn inquiry_after_abandoned_inquiry() -> Result {
        let (client, mut camera) = duplex(256);
        let mut conn = ViscaConnection::new(DeadlineStream::new(
            client,
            Duration::from_millis(300),
        ));

        // The camera never answers the first inquiry.
        assert!(timeout(
            Duration::from_millis(250),
            conn.send_inquiry(Command::ZOOM_POSITION_INQUIRY)
        )
        .await
        .is_err());

        let camera_task = tokio::spawn(async move {
            let mut req = [0; 10];
            camera.read_exact(&mut req).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            camera
                .write_all(&[0x90, 0x50, 0x03, 0x00, 0x0a, 0x02, 0xff])
                .await
                .unwrap();
            camera
        });

        let pkt = conn.send_inquiry(Command::ZOOM_POSITION_INQUIRY).await?;
        assert_eq!(0x30a2, pkt.value(0, 4));
        camera_task.await.unwrap();
        Ok(())
    }

    #[tokio::test]
    async fn passes_data() -> Result {
        let (client, mut camera) = duplex(16);
        let mut client = DeadlineStream::new(client, SHORT);
        client.write_all(&[0x81, 0x09, 0x04, 0x47, 0xff]).await?;
        client.flush().await?;

        let mut b = [0; 5];
        camera.read_exact(&mut b).await?;
        assert_eq!([0x81, 0x09, 0x04, 0x47, 0xff], b);

        camera.write_all(&[0x90, 0x41, 0xff]).await?;
        let mut b = [0; 3];
        client.read_exact(&mut b).await?;
        assert_eq!([0x90, 0x41, 0xff], b);
        Ok(())
    }

    #[tokio::test]
    async fn connect_refused() -> Result {
        // Grab a free port, then close it.
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let e = connect(addr, Duration::from_secs(5)).await.err().unwrap();
        assert!(matches!(e, Error::IoError(_)), "{e:?}");
        assert!(!e.is_timeout());
        Ok(())
    }

    #[tokio::test]
    async fn connect_silent_peer() -> Result {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let peer = tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(sock);
        });

        let mut stream = connect(addr, SHORT).await?;
        let mut b = [0; 1];
        let e = stream.read(&mut b).await.unwrap_err();
        assert_eq!(ErrorKind::TimedOut, e.kind());
        peer.abort();
        Ok(())
    }
}
