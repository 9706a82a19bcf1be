//! L1CTL control-protocol message definitions
//!
//! The L1CTL protocol carries primitives between the upper-layer stack
//! (Layer 2/3) and the virtual Layer 1 over a local stream socket. Every
//! message is framed as a 2-byte big-endian length prefix followed by the
//! payload; the payload starts with a common header (message type + flags).

pub mod l1ctl;

pub use l1ctl::enums::msg_type::L1ctlMsgType;
pub use l1ctl::header::{L1ctlHdr, L1CTL_F_DONE};
pub use l1ctl::msg::{create_l2_msg, L1ctlMsg, L1CTL_MSG_SIZE_MAX};
