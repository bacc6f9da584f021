//! The socket lifecycle: opening a TCP (optionally TLS) stream, reading lines off it, and
//! validating and writing outbound buffers.

use std::{
    io,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadBuf},
    net::TcpStream,
};
use tokio_rustls::{client::TlsStream, rustls, TlsConnector};

use crate::{constants::MAX_LINE_LENGTH, message::OutboundMessage};

/// Either side of the socket this connection speaks over.
enum Stream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for Stream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Stream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_flush(cx),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("I/O error connecting to the server: {0}")]
    Io(#[from] io::Error),
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(#[from] rustls::pki_types::InvalidDnsNameError),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("outbound payload was text, not a byte buffer")]
    MustBeBytes,
    #[error("message exceeds the 512-byte line limit")]
    MessageTooLong,
    #[error("message does not end in CR-LF")]
    NoLineEnding,
    #[error("message contains more than one CR-LF")]
    StrayLineEnding,
    #[error("connection is not open")]
    NotConnected,
    #[error("I/O error writing to the server: {0}")]
    Io(#[from] io::Error),
}

/// What [`Connection::send`] was given. Rust's type system already separates bytes from text, but
/// the client library still treats text as a programmer error distinct from a malformed byte
/// buffer, so the distinction is preserved at this boundary rather than erased by converting text
/// to bytes automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendPayload {
    Bytes(Vec<u8>),
    Text(String),
}

impl From<OutboundMessage> for SendPayload {
    fn from(message: OutboundMessage) -> Self {
        SendPayload::Bytes(message.into_bytes())
    }
}

fn validate(bytes: &[u8]) -> Result<(), SendError> {
    if bytes.len() > MAX_LINE_LENGTH {
        return Err(SendError::MessageTooLong);
    }
    if !bytes.ends_with(b"\r\n") {
        return Err(SendError::NoLineEnding);
    }
    if bytes.windows(2).filter(|w| *w == b"\r\n").count() > 1 {
        return Err(SendError::StrayLineEnding);
    }
    Ok(())
}

/// A TCP (optionally TLS) connection to an IRC server.
///
/// Holds no reference back to the [`Client`](crate::Client) that owns it — the client drives its
/// own read loop with direct access to both itself and this connection, so there is nothing for
/// the connection to push events through.
pub struct Connection {
    host: String,
    port: u16,
    tls: bool,
    io: Option<BufReader<Stream>>,
}

impl Connection {
    pub fn new(host: impl Into<String>, port: u16, tls: bool) -> Self {
        Connection {
            host: host.into(),
            port,
            tls,
            io: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.io.is_some()
    }

    /// Opens the TCP socket (wrapping it in TLS when `tls` is set) and marks the connection open.
    pub async fn open(&mut self) -> Result<(), ConnectError> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port)).await?;
        tcp.set_nodelay(true).ok();

        let stream = if self.tls {
            let connector = tls_connector();
            let server_name = rustls::pki_types::ServerName::try_from(self.host.clone())?;
            let tls_stream = connector.connect(server_name, tcp).await?;
            Stream::Tls(Box::new(tls_stream))
        } else {
            Stream::Plain(tcp)
        };

        self.io = Some(BufReader::new(stream));
        log::debug!("connected to {}:{} (tls={})", self.host, self.port, self.tls);
        Ok(())
    }

    /// Reads one line, CR-LF included. `Ok(None)` signals a blank read (the peer closed the
    /// socket); callers should treat that as end-of-stream and call [`disconnect`](Self::disconnect).
    pub async fn read_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection not open"))?;

        let mut line = Vec::new();
        let n = io.read_until(b'\n', &mut line).await?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    /// Validates and writes one buffer. Validation runs in a fixed order — `MustBeBytes`,
    /// `MessageTooLong`, `NoLineEnding`, `StrayLineEnding` — so the first applicable error wins.
    pub async fn send(&mut self, payload: SendPayload) -> Result<(), SendError> {
        let bytes = match payload {
            SendPayload::Bytes(bytes) => bytes,
            SendPayload::Text(_) => return Err(SendError::MustBeBytes),
        };
        validate(&bytes)?;

        let io = self.io.as_mut().ok_or(SendError::NotConnected)?;
        io.get_mut().write_all(&bytes).await?;
        Ok(())
    }

    /// Sends each message in turn, stopping and propagating on the first failure. Messages already
    /// written before the failure stay written — this is not transactional.
    pub async fn send_batch(
        &mut self,
        messages: impl IntoIterator<Item = OutboundMessage>,
    ) -> Result<(), SendError> {
        for message in messages {
            self.send(SendPayload::from(message)).await?;
        }
        Ok(())
    }

    /// Closes the connection. Idempotent.
    pub fn disconnect(&mut self) {
        if self.io.take().is_some() {
            log::debug!("disconnected from {}:{}", self.host, self.port);
        }
    }
}

fn tls_connector() -> TlsConnector {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}
