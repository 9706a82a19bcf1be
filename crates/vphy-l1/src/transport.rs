//! L1CTL control transport: one listening unix endpoint, at most one
//! connected peer, 2-byte big-endian length framing in both directions.
//!
//! I/O errors are never retried. Any framing fault tears the connection
//! down and the engine simply waits for the stack to reconnect; only
//! endpoint construction failures are fatal.

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use vphy_core::MsgBuf;
use vphy_pdus::L1CTL_MSG_SIZE_MAX;

use crate::error::L1ctlError;

#[derive(Debug)]
pub enum L1ctlSockEvent {
    /// A peer connected to the control endpoint
    Connected,
    /// One well-formed inbound message, payload only (prefix stripped)
    Message(MsgBuf),
    /// The connection faulted or closed and has been torn down
    Disconnected(String),
}

#[derive(Debug)]
pub struct L1ctlServer {
    listener: UnixListener,
    connection: Option<UnixStream>,
    socket_path: PathBuf,
    /// Sends attempted with no connected peer; counted, never escalated
    dropped_sends: u64,
}

impl L1ctlServer {
    /// Bind and listen on the named endpoint. Any stale socket file from a
    /// previous run is removed first. Failure here must abort engine startup.
    pub fn bind<P: AsRef<Path>>(path: P) -> Result<Self, L1ctlError> {
        let socket_path = path.as_ref().to_path_buf();
        if socket_path.exists() {
            let _ = std::fs::remove_file(&socket_path);
        }

        let listener = UnixListener::bind(&socket_path).map_err(|e| {
            L1ctlError::InitFailed(format!("bind {}: {}", socket_path.display(), e))
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|e| L1ctlError::InitFailed(format!("set_nonblocking: {}", e)))?;

        Ok(Self { listener, connection: None, socket_path, dropped_sends: 0 })
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn dropped_sends(&self) -> u64 {
        self.dropped_sends
    }

    /// Service the endpoint without blocking: accept a peer if none is
    /// active, then drain every complete inbound frame.
    pub fn poll(&mut self) -> Vec<L1ctlSockEvent> {
        let mut events = Vec::new();

        // A new connection is only accepted once the previous one has been
        // torn down; until then further peers wait in the listen backlog.
        if self.connection.is_none() {
            match self.listener.accept() {
                Ok((stream, _addr)) => match stream.set_nonblocking(true) {
                    Ok(()) => {
                        tracing::info!("l2 peer connected on {}", self.socket_path.display());
                        self.connection = Some(stream);
                        events.push(L1ctlSockEvent::Connected);
                    }
                    Err(e) => {
                        tracing::warn!("failed to configure accepted connection: {}", e);
                    }
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => tracing::warn!("accept failed: {}", e),
            }
        }

        while self.connection.is_some() {
            match self.read_frame() {
                Ok(Some(msg)) => events.push(L1ctlSockEvent::Message(msg)),
                Ok(None) => break,
                Err(reason) => {
                    tracing::warn!("control connection faulted: {}", reason);
                    self.disconnect();
                    events.push(L1ctlSockEvent::Disconnected(reason));
                }
            }
        }

        events
    }

    /// Read one length-prefixed frame. Ok(None) when no data is pending.
    /// Any malformed or short read is a framing fault; the peer writes each
    /// frame in one piece and no partial-message recovery is attempted.
    fn read_frame(&mut self) -> Result<Option<MsgBuf>, String> {
        let Some(stream) = self.connection.as_mut() else {
            return Ok(None);
        };

        let mut prefix = [0u8; 2];
        match stream.read(&mut prefix) {
            Ok(0) => return Err("peer closed the connection".to_string()),
            Ok(1) => return Err("short read on length prefix".to_string()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(None),
            Err(e) => return Err(format!("read error on length prefix: {}", e)),
        }

        let declared = u16::from_be_bytes(prefix) as usize;
        if declared == 0 || declared > L1CTL_MSG_SIZE_MAX {
            return Err(format!("invalid declared length {}", declared));
        }

        let mut payload = vec![0u8; declared];
        match stream.read(&mut payload) {
            Ok(n) if n == declared => Ok(Some(MsgBuf::from_bytes(&payload))),
            Ok(n) => Err(format!("short payload read: {} of {} bytes", n, declared)),
            Err(e) => Err(format!("read error on payload: {}", e)),
        }
    }

    /// Write an already-framed message verbatim. With no connected peer this
    /// is a counted no-op; a failed write tears the connection down.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), L1ctlError> {
        let Some(stream) = self.connection.as_mut() else {
            self.dropped_sends += 1;
            return Err(L1ctlError::SendNoConnection);
        };

        if let Err(e) = stream.write_all(frame) {
            let reason = format!("write failed: {}", e);
            self.disconnect();
            return Err(L1ctlError::ConnectionLost(reason));
        }
        Ok(())
    }

    /// Tear down the active connection. The listening endpoint stays up.
    pub fn disconnect(&mut self) {
        if let Some(stream) = self.connection.take() {
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
    }
}

impl Drop for L1ctlServer {
    fn drop(&mut self) {
        self.disconnect();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
