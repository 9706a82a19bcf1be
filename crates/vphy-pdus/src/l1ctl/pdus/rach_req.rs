use vphy_core::{MsgBuf, PduParseErr};

/// Channel request from the upper layer (04.08 9.1.8).
///
/// `offset` counts RACH-eligible slots into the future, not raw frames.
/// Wire layout: ra u8, padding u8, offset u16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RachReq {
    /// Raw access code byte (the 8-bit option; 11-bit access is not used)
    pub ra: u8,
    pub offset: u16,
}

impl RachReq {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let ra = buf.read_u8("ra")?;
        buf.read_u8("rach_padding")?;
        let offset = buf.read_u16("offset")?;
        Ok(Self { ra, offset })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.ra);
        buf.write_u8(0);
        buf.write_u16(self.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let req = RachReq { ra: 0xE5, offset: 17 };
        let mut buf = MsgBuf::new(4);
        req.to_msgbuf(&mut buf);
        let mut rd = MsgBuf::from_bytes(buf.as_slice());
        assert_eq!(RachReq::from_msgbuf(&mut rd).unwrap(), req);
    }

    #[test]
    fn test_truncated_rejected() {
        let mut rd = MsgBuf::from_bytes(&[0xE5, 0x00, 0x00]);
        assert_eq!(
            RachReq::from_msgbuf(&mut rd),
            Err(PduParseErr::BufferEnded { field: Some("offset") })
        );
    }
}
