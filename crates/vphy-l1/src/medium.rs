//! Boundary to the virtual medium that carries bursts between simulated
//! mobile stations. The medium's own encapsulation is not this engine's
//! concern: outbound bursts go through the `VirtualMedium` trait, inbound
//! ones arrive as already-decoded `MediumEvent`s on a channel drained by
//! the engine loop.

use crossbeam_channel::{Receiver, Sender};

use vphy_core::Arfcn;

/// A burst observed on the virtual medium.
#[derive(Debug, Clone)]
pub struct MediumEvent {
    /// Raw band+ARFCN as carried by the medium encapsulation; flag bits are
    /// masked at table-lookup time
    pub band_arfcn: u16,
    /// Signal level the medium attributes to the burst
    pub sig_lev_dbm: i16,
    /// Frame number the burst was sent in, per the sender's clock
    pub frame_nr: u32,
    pub burst: Vec<u8>,
}

pub trait VirtualMedium {
    fn transmit(&mut self, burst: &[u8], arfcn: Arfcn, timeslot: u8);
}

/// Medium for running the engine stand-alone: logs and drops every burst.
pub struct DiscardMedium;

impl VirtualMedium for DiscardMedium {
    fn transmit(&mut self, burst: &[u8], arfcn: Arfcn, timeslot: u8) {
        tracing::debug!(
            "discarding {} byte burst for arfcn {} ts {} (no medium attached)",
            burst.len(),
            arfcn,
            timeslot
        );
    }
}

/// Channel pair over which a medium implementation feeds receive events
/// into the engine.
pub fn medium_channel() -> (Sender<MediumEvent>, Receiver<MediumEvent>) {
    crossbeam_channel::unbounded()
}
