//! Uplink/downlink info elements shared by several L1CTL messages.

use vphy_core::{MsgBuf, PduParseErr};

/// RSL channel-number C-bits for the random access channel (08.58 9.3.1).
pub const RSL_CHAN_RACH: u8 = 0x88;

/// Link identifier for the main dedicated channel.
pub const LID_DEDIC: u8 = 0x00;

/// Encode an RSL-style channel number from C-bits and a timeslot.
pub fn rsl_chan_nr(cbits: u8, timeslot: u8) -> u8 {
    cbits | (timeslot & 0x07)
}

/// Uplink routing info, prefixed to requests that address a channel.
/// Encoded as chan_nr, link_id, two padding bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct L1ctlInfoUl {
    pub chan_nr: u8,
    pub link_id: u8,
}

pub const L1CTL_INFO_UL_LEN: usize = 4;

impl L1ctlInfoUl {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        let chan_nr = buf.read_u8("ul_chan_nr")?;
        let link_id = buf.read_u8("ul_link_id")?;
        buf.read_bytes(2, "ul_padding")?;
        Ok(Self { chan_nr, link_id })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.chan_nr);
        buf.write_u8(self.link_id);
        buf.write_bytes(&[0, 0]);
    }
}

/// Downlink status info carried by confirmations and data indications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct L1ctlInfoDl {
    pub chan_nr: u8,
    pub link_id: u8,
    pub band_arfcn: u16,
    pub frame_nr: u32,
    pub rx_level: u8,
    pub snr: u8,
    pub num_biterr: u8,
    pub fire_crc: u8,
}

pub const L1CTL_INFO_DL_LEN: usize = 12;

impl L1ctlInfoDl {
    pub fn from_msgbuf(buf: &mut MsgBuf) -> Result<Self, PduParseErr> {
        Ok(Self {
            chan_nr: buf.read_u8("dl_chan_nr")?,
            link_id: buf.read_u8("dl_link_id")?,
            band_arfcn: buf.read_u16("dl_band_arfcn")?,
            frame_nr: buf.read_u32("dl_frame_nr")?,
            rx_level: buf.read_u8("dl_rx_level")?,
            snr: buf.read_u8("dl_snr")?,
            num_biterr: buf.read_u8("dl_num_biterr")?,
            fire_crc: buf.read_u8("dl_fire_crc")?,
        })
    }

    pub fn to_msgbuf(&self, buf: &mut MsgBuf) {
        buf.write_u8(self.chan_nr);
        buf.write_u8(self.link_id);
        buf.write_u16(self.band_arfcn);
        buf.write_u32(self.frame_nr);
        buf.write_u8(self.rx_level);
        buf.write_u8(self.snr);
        buf.write_u8(self.num_biterr);
        buf.write_u8(self.fire_crc);
    }
}
