use vphy_core::{MsgBuf, PduParseErr};

use crate::l1ctl::enums::msg_type::L1ctlMsgType;

/// Flag bit marking the final message of a multi-message response sequence.
pub const L1CTL_F_DONE: u8 = 0x01;

/// Encoded size of the common header: type, flags, two padding bytes.
pub const L1CTL_HDR_LEN: usize = 4;

/// Offset of the flags byte within the header, for in-place patching.
pub const L1CTL_HDR_FLAGS_OFFSET: usize = 1;

/// Common header at the start of every L1CTL payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1ctlHdr {
    pub msg_type: L1ctlMsgType,
    pub flags: u8,
}

impl L1ctlHdr {
    pub fn new(msg_type: L1ctlMsgType) -> Self {
        Self { msg_type, flags: 0 }
    }

    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let msg_type = L1ctlMsgType::from_raw(buf.read_u8("msg_type")?)?;
        let flags = buf.read_u8("flags")?;
        buf.read_bytes(2, "hdr_padding")?;
        Ok(Self { msg_type, flags })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.msg_type.into_raw());
        buf.write_u8(self.flags);
        buf.write_bytes(&[0, 0]);
    }
}
