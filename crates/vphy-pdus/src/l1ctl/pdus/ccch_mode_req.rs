use vphy_core::chan::CcchMode;
use vphy_core::{MsgBuf, PduParseErr};

/// Tells L1 the CCCH combination of the serving cell, decoded by the upper
/// layer from system information. Wire layout: ccch_mode u8, 3 padding bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcchModeReq {
    pub ccch_mode: CcchMode,
}

impl CcchModeReq {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let raw = buf.read_u8("ccch_mode")?;
        let ccch_mode = CcchMode::from_raw(raw)
            .ok_or(PduParseErr::InvalidValue { field: "ccch_mode", value: raw as u64 })?;
        buf.read_bytes(3, "ccch_padding")?;
        Ok(Self { ccch_mode })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.ccch_mode.into_raw());
        buf.write_bytes(&[0, 0, 0]);
    }
}
