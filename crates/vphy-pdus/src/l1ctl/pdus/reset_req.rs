use vphy_core::{MsgBuf, PduParseErr};

pub const L1CTL_RES_T_BOOT: u8 = 0;
pub const L1CTL_RES_T_FULL: u8 = 1;
pub const L1CTL_RES_T_SCHED: u8 = 2;

/// Reset request from the upper layer. The granularity byte is carried for
/// wire compatibility; this engine always performs a full reset.
/// Wire layout: kind u8, 3 padding bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetReq {
    pub kind: u8,
}

impl ResetReq {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let kind = buf.read_u8("reset_kind")?;
        buf.read_bytes(3, "reset_padding")?;
        Ok(Self { kind })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.kind);
        buf.write_bytes(&[0, 0, 0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let req = ResetReq { kind: L1CTL_RES_T_FULL };
        let mut buf = MsgBuf::new(4);
        req.to_msgbuf(&mut buf);
        let mut rd = MsgBuf::from_bytes(buf.as_slice());
        assert_eq!(ResetReq::from_msgbuf(&mut rd).unwrap(), req);
    }
}
