//! UDP broadcast channel.
//!
//! Controllers of one installation exchange small JSON datagrams on a
//! shared port: every [`Channel::send`] fans the message out to all
//! configured peers, every [`Channel::recv`] yields the next parsed
//! datagram together with its sender. There is no session state and no
//! delivery guarantee beyond what UDP gives.

use std::net::SocketAddr;

use serde::Serialize;
use tokio::net::UdpSocket;
use tracing::{debug, trace, warn};

use crate::config::ChannelConfig;
use crate::error::{Error, Result};

// Largest payload an IPv4 UDP datagram can carry.
const MAX_DATAGRAM: usize = 65_507;

/// JSON datagram fan-out to a fixed peer set.
///
/// # Example
///
/// ```rust
/// use rs_hearth::channel::Channel;
/// use rs_hearth::config::ChannelConfig;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> rs_hearth::Result<()> {
/// // Port 0 picks an ephemeral port, reported by `port()` once open.
/// let mut channel = Channel::new(ChannelConfig::new(0));
/// channel.open().await?;
/// assert!(channel.port() > 0);
/// channel.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Channel {
    config: ChannelConfig,
    socket: Option<UdpSocket>,
    recv_buf: Vec<u8>,
}

impl Channel {
    /// Creates a closed channel; call [`Channel::open`] before use.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            socket: None,
            recv_buf: vec![0; MAX_DATAGRAM],
        }
    }

    /// Binds the UDP socket on all interfaces.
    ///
    /// With a configured port of `0` the OS assigns an ephemeral port,
    /// visible through [`Channel::port`] afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelOpen`] when already open, or [`Error::Io`] when the
    /// bind fails.
    pub async fn open(&mut self) -> Result<()> {
        if self.socket.is_some() {
            return Err(Error::ChannelOpen);
        }
        let socket = UdpSocket::bind(("0.0.0.0", self.config.port)).await?;
        self.config.port = socket.local_addr()?.port();
        debug!(port = self.config.port, peers = self.config.peers.len(), "channel open");
        self.socket = Some(socket);
        Ok(())
    }

    /// Releases the socket.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelClosed`] when the channel is not open.
    pub fn close(&mut self) -> Result<()> {
        match self.socket.take() {
            Some(_) => {
                debug!(port = self.config.port, "channel closed");
                Ok(())
            }
            None => Err(Error::ChannelClosed),
        }
    }

    /// The channel's UDP port: the bound port once open, the configured
    /// port before that.
    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Whether the socket is currently bound.
    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Serializes `message` as JSON and sends it to every configured peer.
    ///
    /// All peers are attempted even when one send fails; the first error
    /// is returned afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelClosed`] when the channel is not open, or the first
    /// I/O error produced by a peer send.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(Error::ChannelClosed)?;
        let payload = serde_json::to_vec(message)?;
        let mut first_err = None;
        for peer in &self.config.peers {
            match socket.send_to(&payload, (peer.as_str(), self.config.port)).await {
                Ok(bytes) => trace!(%peer, bytes, "datagram sent"),
                Err(err) => {
                    warn!(%peer, error = %err, "datagram send failed");
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Awaits the next datagram and parses it as JSON.
    ///
    /// A malformed payload is reported as an error without disturbing the
    /// socket; the caller can simply call `recv` again.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelClosed`] when the channel is not open,
    /// [`Error::MalformedMessage`] when the payload is not valid JSON, or
    /// [`Error::Io`] from the socket.
    pub async fn recv(&mut self) -> Result<(serde_json::Value, SocketAddr)> {
        let socket = self.socket.as_ref().ok_or(Error::ChannelClosed)?;
        let (len, from) = socket.recv_from(&mut self.recv_buf).await?;
        let message = serde_json::from_slice(&self.recv_buf[..len])?;
        Ok((message, from))
    }
}

// ============================================================================
// Tests
// ============================================================================
