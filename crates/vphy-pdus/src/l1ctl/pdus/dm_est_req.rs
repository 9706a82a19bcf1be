use vphy_core::{MsgBuf, PduParseErr};

/// Dedicated-channel establishment from the upper layer: the stack was
/// assigned a traffic/signalling channel and tells L1 where it lives.
/// Wire layout: chan_nr u8, tsc u8, h u8, padding u8, band_arfcn u16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmEstReq {
    /// RSL-style channel number (type + timeslot)
    pub chan_nr: u8,
    /// Training sequence code
    pub tsc: u8,
    /// Hopping flag; hopping parameters are not modeled on the virtual medium
    pub h: u8,
    pub band_arfcn: u16,
}

impl DmEstReq {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let chan_nr = buf.read_u8("chan_nr")?;
        let tsc = buf.read_u8("tsc")?;
        let h = buf.read_u8("h")?;
        buf.read_u8("dm_padding")?;
        let band_arfcn = buf.read_u16("band_arfcn")?;
        Ok(Self { chan_nr, tsc, h, band_arfcn })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.chan_nr);
        buf.write_u8(self.tsc);
        buf.write_u8(self.h);
        buf.write_u8(0);
        buf.write_u16(self.band_arfcn);
    }

    /// Timeslot number encoded in the low bits of chan_nr.
    pub fn timeslot(&self) -> u8 {
        self.chan_nr & 0x07
    }
}
