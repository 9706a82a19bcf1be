//! Mobile-station time and state model.
//!
//! Single source of truth for GSM timing and cell/channel configuration,
//! read-mostly by the primitives. The engine is its exclusive owner; no
//! other component holds the canonical time, and primitives read it fresh
//! for every scheduling decision instead of caching a copy.

use vphy_config::SharedConfig;
use vphy_core::chan::CcchMode;
use vphy_core::{Arfcn, GsmTime};

use crate::prims::pm::PmState;

/// Number of neighbor cells tracked for reselection measurements.
pub const NUM_NEIGH_CELLS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MsSyncState {
    #[default]
    IdleSearching,
    IdleSyncing,
    IdleCamping,
    Dedicated,
}

/// Synchronization info about one cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellInfo {
    pub arfcn: Arfcn,
    /// Base station identity code, from SCH decoding
    pub bsic: u8,
    pub ccch_mode: CcchMode,
    /// Delta of the cell's frame number against our local frame number
    pub fn_offset: i32,
    /// Timing adjustment needed to align with the cell's bursts
    pub time_alignment: u32,
}

/// The dedicated channel currently assigned by the stack, if any.
#[derive(Debug, Clone, Copy)]
pub struct DedicatedChannel {
    /// RSL-style channel number (type + timeslot), 08.58 9.3.1
    pub chan_nr: u8,
    pub timeslot: u8,
    /// Training sequence code (unused on the virtual medium)
    pub tsc: u8,
    /// Hopping flag (unused on the virtual medium)
    pub hopping: bool,
}

pub struct MsState {
    /// Last GSM time received from the medium
    downlink_time: GsmTime,
    /// GSM time used internally for scheduling. Advances monotonically
    /// (modulo the hyperframe) and never regresses.
    current_time: GsmTime,

    pub sync_state: MsSyncState,
    pub serving_cell: CellInfo,
    pub neigh_cells: [CellInfo; NUM_NEIGH_CELLS],
    pub dedicated: Option<DedicatedChannel>,

    pub pm: PmState,
}

impl MsState {
    pub fn new(config: &SharedConfig) -> Self {
        let cfg = config.config();
        let serving_cell = CellInfo {
            arfcn: Arfcn::new(cfg.cell.arfcn),
            bsic: cfg.cell.bsic,
            ccch_mode: cfg.cell.ccch_mode,
            fn_offset: 0,
            time_alignment: 0,
        };
        let sync_state = if cfg.cell.ccch_mode == CcchMode::None {
            MsSyncState::IdleSearching
        } else {
            MsSyncState::IdleCamping
        };
        Self {
            downlink_time: GsmTime::default(),
            current_time: GsmTime::default(),
            sync_state,
            serving_cell,
            neigh_cells: [CellInfo::default(); NUM_NEIGH_CELLS],
            dedicated: None,
            pm: PmState::new(cfg.pm.decay_timeout_ms),
        }
    }

    #[inline(always)]
    pub fn current_time(&self) -> GsmTime {
        self.current_time
    }

    #[inline(always)]
    pub fn downlink_time(&self) -> GsmTime {
        self.downlink_time
    }

    /// Advance local time by one frame. The engine's time-advance step is
    /// the only caller; nothing else may mutate `current_time`.
    pub fn advance_frame(&mut self) -> GsmTime {
        self.current_time = self.current_time.add_frames(1);
        self.current_time
    }

    pub fn set_downlink_time(&mut self, t: GsmTime) {
        self.downlink_time = t;
    }

    /// Full reset as requested by the upper layer: drop the dedicated
    /// channel and restart the local timeline. Measurement state is left to
    /// decay on its own.
    pub fn reset(&mut self) {
        self.downlink_time = GsmTime::default();
        self.current_time = GsmTime::default();
        self.dedicated = None;
        self.sync_state = if self.serving_cell.ccch_mode == CcchMode::None {
            MsSyncState::IdleSearching
        } else {
            MsSyncState::IdleCamping
        };
    }
}
