use core::fmt;

/// Engine-level error taxonomy.
///
/// Only `InitFailed` is fatal: it means the control endpoint could not be
/// constructed and the engine must not start. Everything else is handled at
/// the connection boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L1ctlError {
    /// Bind/listen on the control endpoint failed
    InitFailed(String),
    /// Malformed length prefix or payload; the connection is torn down
    Framing(String),
    /// The active connection died on a read or write
    ConnectionLost(String),
    /// Recognized frame with an unhandled message type; dropped, the
    /// connection stays open
    Dispatch { msg_type: u8 },
    /// Send attempted with no connected peer; counted, not escalated
    SendNoConnection,
}

impl fmt::Display for L1ctlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            L1ctlError::InitFailed(msg) => write!(f, "control endpoint init failed: {}", msg),
            L1ctlError::Framing(msg) => write!(f, "framing fault: {}", msg),
            L1ctlError::ConnectionLost(msg) => write!(f, "connection lost: {}", msg),
            L1ctlError::Dispatch { msg_type } => {
                write!(f, "no handler for message type {:#04x}", msg_type)
            }
            L1ctlError::SendNoConnection => write!(f, "send with no active connection"),
        }
    }
}

impl std::error::Error for L1ctlError {}
