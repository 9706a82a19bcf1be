use vphy_core::{MsgBuf, PduParseErr};

/// Measurement over a contiguous carrier range.
pub const PM_KIND_RANGE: u8 = 1;

/// Power-measurement request from the upper layer.
/// Wire layout: kind u8, padding u8, band_arfcn_from u16, band_arfcn_to u16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmReq {
    pub kind: u8,
    /// Raw band+ARFCN values; flag bits are masked at lookup time
    pub band_arfcn_from: u16,
    pub band_arfcn_to: u16,
}

impl PmReq {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let kind = buf.read_u8("pm_kind")?;
        buf.read_u8("pm_padding")?;
        let band_arfcn_from = buf.read_u16("band_arfcn_from")?;
        let band_arfcn_to = buf.read_u16("band_arfcn_to")?;
        Ok(Self { kind, band_arfcn_from, band_arfcn_to })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.kind);
        buf.write_u8(0);
        buf.write_u16(self.band_arfcn_from);
        buf.write_u16(self.band_arfcn_to);
    }
}

/// One per-carrier entry of a PM_CONF response. As many entries as fit are
/// packed into each response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmConfEntry {
    pub band_arfcn: u16,
    /// Min and max rxlev observed; this engine reports the same value twice
    pub rxlev: [u8; 2],
}

pub const PM_CONF_ENTRY_LEN: usize = 4;

impl PmConfEntry {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let band_arfcn = buf.read_u16("pm_band_arfcn")?;
        let rxlev = [buf.read_u8("rxlev_min")?, buf.read_u8("rxlev_max")?];
        Ok(Self { band_arfcn, rxlev })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u16(self.band_arfcn);
        buf.write_u8(self.rxlev[0]);
        buf.write_u8(self.rxlev[1]);
    }
}
