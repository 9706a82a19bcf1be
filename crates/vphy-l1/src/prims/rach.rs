//! Random-access primitive.
//!
//! Turns an L1CTL channel request into a correctly timed access burst plus
//! a confirmation. Stateless per request: each one is computed from the
//! current time and the request's own fields only.

use vphy_core::chan::CcchMode;
use vphy_core::{GsmTime, MsgBuf, PduParseErr, GSM_MAX_FN};
use vphy_pdus::l1ctl::info::{rsl_chan_nr, L1ctlInfoUl, LID_DEDIC, RSL_CHAN_RACH};
use vphy_pdus::l1ctl::pdus::rach_req::RachReq;

use crate::model::MsState;
use crate::prims::SchedWork;
use crate::sched::Scheduler;

/// Timeslot the access burst goes out on.
// TODO derive the RACH timeslot from the serving cell's system information
// instead of assuming the usual CCCH placement
pub const RACH_TIMESLOT: u8 = 1;

/// Access cause that forces a fixed target frame, regardless of offset.
/// Evaluated before any combined/non-combined arithmetic.
pub const RA_FIXED_FRAME: u8 = 0x03;
const FIXED_FRAME_TARGET: u32 = 42;

/// Number of RACH slots per combined-configuration cycle.
const RACH_COMB_CYCLE: u32 = 27;

// With a combined channel configuration the uplink 51-multiframe is shared
// between RACH and SDCCH; without it, the uplink is RACH only. These two
// tables are the RACH slot distribution for the combined case and are fixed
// contract, not derived.
#[rustfmt::skip]
const T3_TO_RACH_COMB: [u8; 51] = [
    0, 0, 0, 0, 0, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 4, 5, 6, 7, 8, 9, 10,
    11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 25, 25, 25,
    25, 25, 25, 25, 25, 26, 27, 27, 27, 27,
];
#[rustfmt::skip]
const RACH_TO_T3_COMB: [u8; 27] = [
    4, 5, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29,
    30, 31, 32, 33, 34, 35, 36, 45, 46,
];

/// Payload of a scheduled access burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RachBurst {
    /// Raw access code byte, transmitted as-is
    pub ra: u8,
    /// Uplink routing: RACH channel number encoding
    pub chan_nr: u8,
    pub link_id: u8,
}

/// Compute the frame number an access burst with the given slot offset goes
/// out on. `offset` counts RACH-eligible slots, not frames.
pub fn rach_target_fn(current: GsmTime, ccch_mode: CcchMode, ra: u8, offset: u16) -> u32 {
    if ra == RA_FIXED_FRAME {
        return FIXED_FRAME_TARGET;
    }

    match ccch_mode {
        CcchMode::Combined => {
            let t3 = current.t3() as u32;
            // Adjust the caller's offset for RACH slots already elapsed in
            // this multiframe, then anchor the result at the multiframe
            // start: whole multiframes for every full 27-slot cycle, plus
            // the in-multiframe position of the remainder.
            let offset = offset as u32 + T3_TO_RACH_COMB[t3 as usize] as u32;
            let mut fn_sched = current.frame_number() as i64 - t3 as i64;
            fn_sched += (offset / RACH_COMB_CYCLE) as i64 * 51;
            fn_sched += RACH_TO_T3_COMB[(offset % RACH_COMB_CYCLE) as usize] as i64;
            fn_sched.rem_euclid(GSM_MAX_FN as i64) as u32
        }
        // Without a combined configuration the uplink is RACH in every
        // frame, so the slot offset is a plain frame offset.
        _ => (current.frame_number() + offset as u32) % GSM_MAX_FN,
    }
}

/// Handle an L1CTL_RACH_REQ body (uplink info + request).
pub fn handle_rach_req(
    state: &MsState,
    sched: &mut Scheduler<SchedWork>,
    buf: &mut MsgBuf,
) -> Result<(), PduParseErr> {
    let _ul = L1ctlInfoUl::from_msgbuf(buf)?;
    let req = RachReq::from_msgbuf(buf)?;

    let ccch_mode = state.serving_cell.ccch_mode;
    let fn_sched = rach_target_fn(state.current_time(), ccch_mode, req.ra, req.offset);

    tracing::debug!(
        "rach req ra {:#04x} offset {} ccch {:?}: scheduled for fn {} ts {}",
        req.ra,
        req.offset,
        ccch_mode,
        fn_sched,
        RACH_TIMESLOT
    );

    // chan_nr is not filled in by the upper layer for a channel request;
    // encode the RACH routing here, where the timeslot is known.
    let burst = RachBurst {
        ra: req.ra,
        chan_nr: rsl_chan_nr(RSL_CHAN_RACH, RACH_TIMESLOT),
        link_id: LID_DEDIC,
    };
    sched.schedule(SchedWork::RachTx(burst), fn_sched, RACH_TIMESLOT);
    Ok(())
}
