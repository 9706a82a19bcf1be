//! Power-measurement primitive.
//!
//! Keeps a live per-carrier signal-level estimate fed by medium receive
//! events, with decay-on-silence, and answers ranged measurement queries in
//! size-bounded response chunks.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use vphy_core::{dbm2rxlev, Arfcn, MsgBuf, PduParseErr, ARFCN_RANGE, MIN_SIG_LEV_DBM};
use vphy_pdus::l1ctl::pdus::pm_req::{PmConfEntry, PmReq, PM_CONF_ENTRY_LEN};
use vphy_pdus::{L1ctlMsg, L1ctlMsgType};

#[derive(Debug, Clone, Copy)]
struct PmEntry {
    sig_lev_dbm: i16,
    /// Configured per-carrier attenuation, applied to every update
    sig_lev_red_dbm: i16,
    /// Armed decay deadline; the heap may hold stale copies after a rearm,
    /// so this field is authoritative
    deadline: Option<Instant>,
}

/// Per-ARFCN measurement table spanning the whole numbering plan.
pub struct PmState {
    entries: Vec<PmEntry>,
    /// Pending decay deadlines, earliest first. Holds the carrier index,
    /// never a reference into the table.
    deadlines: BinaryHeap<Reverse<(Instant, usize)>>,
    decay_timeout: Option<Duration>,
}

impl PmState {
    /// Every carrier starts at the worst possible level with no decay armed.
    pub fn new(decay_timeout_ms: u64) -> Self {
        let entry = PmEntry { sig_lev_dbm: MIN_SIG_LEV_DBM, sig_lev_red_dbm: 0, deadline: None };
        Self {
            entries: vec![entry; ARFCN_RANGE],
            deadlines: BinaryHeap::new(),
            decay_timeout: (decay_timeout_ms > 0).then(|| Duration::from_millis(decay_timeout_ms)),
        }
    }

    pub fn level_dbm(&self, arfcn: Arfcn) -> i16 {
        self.entries[arfcn.index()].sig_lev_dbm
    }

    pub fn set_reduction(&mut self, arfcn: Arfcn, red_dbm: i16) {
        self.entries[arfcn.index()].sig_lev_red_dbm = red_dbm;
    }

    /// Record a burst observed on a carrier. Applies the configured
    /// reduction and, when decay is enabled, (re)arms the one-shot deadline
    /// that resets the level once the carrier goes silent.
    pub fn set_sig_strength(&mut self, arfcn: Arfcn, sig_lev_dbm: i16, now: Instant) -> i16 {
        let idx = arfcn.index();
        if let Some(timeout) = self.decay_timeout {
            let deadline = now + timeout;
            self.entries[idx].deadline = Some(deadline);
            self.deadlines.push(Reverse((deadline, idx)));
        }

        let entry = &mut self.entries[idx];
        entry.sig_lev_dbm = sig_lev_dbm - entry.sig_lev_red_dbm;
        tracing::debug!(
            "pm: arfcn {} level {} dBm (rxlev {})",
            arfcn,
            entry.sig_lev_dbm,
            dbm2rxlev(entry.sig_lev_dbm)
        );
        entry.sig_lev_dbm
    }

    /// Fire expired decay deadlines in expiry order, resetting each unheard
    /// carrier to the worst value. Stale heap entries left behind by a rearm
    /// are skipped by checking against the entry's own deadline.
    pub fn poll_decay(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(&Reverse((deadline, idx))) = self.deadlines.peek() {
            if deadline > now {
                break;
            }
            self.deadlines.pop();

            let entry = &mut self.entries[idx];
            if entry.deadline == Some(deadline) {
                entry.sig_lev_dbm = MIN_SIG_LEV_DBM;
                entry.deadline = None;
                fired += 1;
                tracing::debug!("pm: arfcn {} unheard, level reset to worst value", idx);
            }
        }
        fired
    }
}

/// Parse an L1CTL_PM_REQ body and build the full PM_CONF response sequence,
/// already framed for the wire.
pub fn handle_pm_req(pm: &PmState, buf: &mut MsgBuf) -> Result<Vec<Vec<u8>>, PduParseErr> {
    let req = PmReq::from_msgbuf(buf)?;
    tracing::debug!(
        "pm req kind {} range [{}, {}]",
        req.kind,
        req.band_arfcn_from,
        req.band_arfcn_to
    );
    Ok(build_pm_conf(pm, &req))
}

/// Entries are packed into each response message until it cannot hold
/// another one; the message carrying the final entry gets the DONE flag.
/// This chunking is wire contract, not an optimization.
pub fn build_pm_conf(pm: &PmState, req: &PmReq) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut msg = L1ctlMsg::new(L1ctlMsgType::PmConf);

    let from = req.band_arfcn_from;
    let to = req.band_arfcn_to;
    for raw in from..=to {
        if msg.tailroom() < PM_CONF_ENTRY_LEN {
            out.push(msg.finish());
            msg = L1ctlMsg::new(L1ctlMsgType::PmConf);
        }

        // Mask band/flag bits before the table lookup; report the raw value
        // back so the requester can match it up.
        let rxlev = dbm2rxlev(pm.level_dbm(Arfcn::new(raw)));
        PmConfEntry { band_arfcn: raw, rxlev: [rxlev, rxlev] }.to_msgbuf(msg.buf_mut());

        if raw == to {
            msg.set_done_flag();
        }
    }
    if from > to {
        // Degenerate range: still terminate the sequence for the peer
        msg.set_done_flag();
    }
    out.push(msg.finish());
    out
}
