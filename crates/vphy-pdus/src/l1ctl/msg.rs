//! Outbound message construction.
//!
//! The 2-byte big-endian length prefix is part of the constructed message:
//! `finish()` backfills it once the body is complete, and the transport
//! writes the result verbatim. The prefix is never re-derived at send time.

use vphy_core::MsgBuf;

use crate::l1ctl::enums::msg_type::L1ctlMsgType;
use crate::l1ctl::header::{L1ctlHdr, L1CTL_F_DONE, L1CTL_HDR_FLAGS_OFFSET};
use crate::l1ctl::info::L1ctlInfoDl;

/// Maximum payload length, in both directions. A declared length above this
/// faults the connection.
pub const L1CTL_MSG_SIZE_MAX: usize = 256;

/// Size of the wire length prefix.
pub const L1CTL_FRAME_PREFIX_LEN: usize = 2;

/// An outbound L1CTL message under construction: length placeholder, common
/// header, then whatever body the caller appends through `buf_mut()`.
pub struct L1ctlMsg {
    buf: MsgBuf,
}

impl L1ctlMsg {
    pub fn new(msg_type: L1ctlMsgType) -> Self {
        let mut buf = MsgBuf::new(L1CTL_FRAME_PREFIX_LEN + L1CTL_MSG_SIZE_MAX);
        buf.write_u16(0); // backfilled by finish()
        buf.mark_l1h();
        L1ctlHdr::new(msg_type).to_msgbuf(&mut buf);
        Self { buf }
    }

    pub fn buf_mut(&mut self) -> &mut MsgBuf {
        &mut self.buf
    }

    pub fn tailroom(&self) -> usize {
        self.buf.tailroom()
    }

    /// Set the DONE flag on the common header, in place.
    pub fn set_done_flag(&mut self) {
        let pos = self.buf.l1h() + L1CTL_HDR_FLAGS_OFFSET;
        let flags = self.buf.get_u8(pos);
        self.buf.set_u8(pos, flags | L1CTL_F_DONE);
    }

    /// Backfill the length prefix and return the framed wire bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let payload_len = (self.buf.len() - L1CTL_FRAME_PREFIX_LEN) as u16;
        let raw = payload_len.to_be_bytes();
        self.buf.set_u8(0, raw[0]);
        self.buf.set_u8(1, raw[1]);
        self.buf.into_vec()
    }
}

/// Shared constructor for downlink confirmations: header plus an info_dl
/// carrying the frame number and carrier the event happened on.
pub fn create_l2_msg(msg_type: L1ctlMsgType, frame_nr: u32, snr: u8, band_arfcn: u16) -> L1ctlMsg {
    let mut msg = L1ctlMsg::new(msg_type);
    let dl = L1ctlInfoDl { frame_nr, snr, band_arfcn, ..Default::default() };
    dl.to_msgbuf(msg.buf_mut());
    msg
}

#[cfg(test)]
mod tests {
    use vphy_core::PduParseErr;

    use super::*;
    use crate::l1ctl::header::L1ctlHdr;

    /// Strip and validate the length prefix of a framed message, returning
    /// the payload. Mirrors what the receiving side does.
    fn unframe(wire: &[u8]) -> Result<&[u8], PduParseErr> {
        let declared = u16::from_be_bytes([wire[0], wire[1]]) as usize;
        let payload = &wire[L1CTL_FRAME_PREFIX_LEN..];
        if declared != payload.len() {
            return Err(PduParseErr::InconsistentLength { expected: declared, found: payload.len() });
        }
        Ok(payload)
    }

    #[test]
    fn test_prefix_matches_payload() {
        let mut msg = L1ctlMsg::new(L1ctlMsgType::EchoConf);
        msg.buf_mut().write_bytes(&[0xAA, 0xBB, 0xCC]);
        let wire = msg.finish();
        let payload = unframe(&wire).unwrap();
        assert_eq!(payload.len(), 4 + 3);
    }

    #[test]
    fn test_conf_roundtrip() {
        let wire = create_l2_msg(L1ctlMsgType::RachConf, 1005, 0, 871).finish();
        let payload = unframe(&wire).unwrap();

        let mut rd = MsgBuf::from_bytes(payload);
        let hdr = L1ctlHdr::from_msgbuf(&mut rd).unwrap();
        assert_eq!(hdr.msg_type, L1ctlMsgType::RachConf);
        assert_eq!(hdr.flags, 0);
        let dl = L1ctlInfoDl::from_msgbuf(&mut rd).unwrap();
        assert_eq!(dl.frame_nr, 1005);
        assert_eq!(dl.band_arfcn, 871);
    }

    #[test]
    fn test_done_flag_patched() {
        let mut msg = create_l2_msg(L1ctlMsgType::PmConf, 0, 0, 0);
        msg.set_done_flag();
        let wire = msg.finish();
        let payload = unframe(&wire).unwrap();

        let mut rd = MsgBuf::from_bytes(payload);
        let hdr = L1ctlHdr::from_msgbuf(&mut rd).unwrap();
        assert_eq!(hdr.flags & L1CTL_F_DONE, L1CTL_F_DONE);
    }
}
