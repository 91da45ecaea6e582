//! Connection Handler
//!
//! One TCP connection to a projector, framed into CR-terminated lines.
//! A connection is consumed by exactly one of [`Connection::close`] or
//! [`Connection::abort`].

use std::io;
use std::net::Shutdown;
use std::time::Duration;

use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::error::AttemptError;
use crate::protocol::LineCodec;

/// A single-use connection to a projector
pub struct Connection {
    /// Line-framed TCP stream
    framed: Framed<TcpStream, LineCodec>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `host:port`
    pub async fn open(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;

        // Requests are a single short line
        stream.set_nodelay(true)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", host, port));

        tracing::debug!("Connection established to {}", peer_addr);

        Ok(Self {
            framed: Framed::new(stream, LineCodec),
            peer_addr,
        })
    }

    /// Wait for the next inbound line
    ///
    /// `None` once the peer has closed and all buffered data is consumed.
    pub async fn next_line(&mut self) -> Option<io::Result<BytesMut>> {
        self.framed.next().await
    }

    /// Write one request line and flush it
    pub async fn send_line(&mut self, line: Vec<u8>) -> io::Result<()> {
        self.framed.send(line).await
    }

    /// Close gracefully within `grace`
    ///
    /// Shuts down the write half and waits for the peer to finish. A socket
    /// error while waiting counts as closed. If the window elapses the socket
    /// is destroyed and `CloseFailed` is returned.
    pub async fn close(self, grace: Duration) -> Result<(), AttemptError> {
        let peer_addr = self.peer_addr;
        let mut stream = self.framed.into_inner();

        let confirmed = tokio::time::timeout(grace, async {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Shutdown of {} reported: {}", peer_addr, e);
                return;
            }

            let mut scratch = [0u8; 64];
            loop {
                match stream.read(&mut scratch).await {
                    Ok(0) => return,
                    Ok(n) => tracing::trace!("Discarding {} trailing bytes from {}", n, peer_addr),
                    Err(e) => {
                        tracing::debug!("Close of {} reported: {}", peer_addr, e);
                        return;
                    }
                }
            }
        })
        .await;

        match confirmed {
            Ok(()) => {
                tracing::trace!("Connection to {} closed", peer_addr);
                Ok(())
            }
            Err(_) => {
                tracing::warn!(
                    "Connection to {} not closed within {:?}, destroying",
                    peer_addr,
                    grace
                );
                if let Err(e) = destroy(stream) {
                    tracing::debug!("Destroying connection to {} reported: {}", peer_addr, e);
                }
                Err(AttemptError::CloseFailed)
            }
        }
    }

    /// Tear the connection down immediately, skipping the graceful close
    pub fn abort(self) -> io::Result<()> {
        tracing::debug!("Aborting connection to {}", self.peer_addr);
        destroy(self.framed.into_inner())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Shut both directions without waiting, then release the socket
///
/// A socket the peer already reset reports `NotConnected`; it is gone either
/// way, so that counts as destroyed.
fn destroy(stream: TcpStream) -> io::Result<()> {
    let stream = stream.into_std()?;
    match stream.shutdown(Shutdown::Both) {
        Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
        other => other,
    }
}
