//! The virtual-L1 engine: a single-threaded cooperative loop servicing the
//! control transport, the virtual-medium feed, the decay timers and the
//! frame-number scheduler.
//!
//! Nothing here blocks. A slow control peer only delays its own next read;
//! medium events, decay and scheduled bursts keep flowing. Disconnecting
//! the control connection cancels nothing: in-flight scheduled actions
//! still fire, and their confirmations become counted no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use vphy_config::SharedConfig;
use vphy_core::{Arfcn, GsmTime, MsgBuf, PduParseErr, FRAME_DURATION_US};
use vphy_pdus::l1ctl::header::L1ctlHdr;
use vphy_pdus::l1ctl::pdus::ccch_mode_req::CcchModeReq;
use vphy_pdus::l1ctl::pdus::dm_est_req::DmEstReq;
use vphy_pdus::l1ctl::pdus::reset_req::ResetReq;
use vphy_pdus::{create_l2_msg, L1ctlMsg, L1ctlMsgType};

use crate::error::L1ctlError;
use crate::medium::{MediumEvent, VirtualMedium};
use crate::model::{DedicatedChannel, MsSyncState, MsState};
use crate::prims::rach::RachBurst;
use crate::prims::{pm, rach, SchedWork};
use crate::sched::{SchedEntry, Scheduler};
use crate::transport::{L1ctlServer, L1ctlSockEvent};

pub struct L1Engine {
    config: SharedConfig,
    state: MsState,
    sched: Scheduler<SchedWork>,
    server: L1ctlServer,
    medium: Box<dyn VirtualMedium>,
    medium_rx: Receiver<MediumEvent>,
}

impl L1Engine {
    /// Build the engine and bind the control endpoint. A bind/listen
    /// failure is fatal: the engine must not start without its socket.
    pub fn new(
        config: SharedConfig,
        medium: Box<dyn VirtualMedium>,
        medium_rx: Receiver<MediumEvent>,
    ) -> Result<Self, L1ctlError> {
        let server = L1ctlServer::bind(&config.config().l1ctl.socket_path)?;
        let state = MsState::new(&config);
        Ok(Self { config, state, sched: Scheduler::new(), server, medium, medium_rx })
    }

    pub fn state(&self) -> &MsState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MsState {
        &mut self.state
    }

    pub fn sched_len(&self) -> usize {
        self.sched.len()
    }

    pub fn has_connection(&self) -> bool {
        self.server.has_connection()
    }

    pub fn dropped_sends(&self) -> u64 {
        self.server.dropped_sends()
    }

    /// One iteration of the cooperative loop: transport readiness, medium
    /// receive, decay expiry, then the time advance with its scheduler pass.
    pub fn poll_once(&mut self) {
        self.service_transport();
        self.service_medium();
        self.state.pm.poll_decay(Instant::now());
        self.advance_time();
    }

    /// Run until `running` is cleared, pacing one GSM frame per iteration.
    pub fn run(&mut self, running: Option<Arc<AtomicBool>>) {
        tracing::info!(
            "virtual L1 ready, control socket {}",
            self.config.config().l1ctl.socket_path
        );
        loop {
            if let Some(ref running) = running {
                if !running.load(Ordering::SeqCst) {
                    tracing::info!("shutdown requested");
                    break;
                }
            }
            self.poll_once();
            std::thread::sleep(Duration::from_micros(FRAME_DURATION_US));
        }
    }

    fn service_transport(&mut self) {
        let events = self.server.poll();
        for event in events {
            match event {
                L1ctlSockEvent::Connected => {
                    tracing::info!("upper-layer stack connected");
                }
                L1ctlSockEvent::Message(mut buf) => {
                    if let Err(e) = self.dispatch(&mut buf) {
                        // Parse/dispatch trouble drops the message only;
                        // the connection stays open.
                        tracing::warn!("message dropped: {}", e);
                    }
                }
                L1ctlSockEvent::Disconnected(reason) => {
                    tracing::warn!("control connection closed ({}), waiting for a new one", reason);
                }
            }
        }
    }

    fn dispatch(&mut self, buf: &mut MsgBuf) -> Result<(), PduParseErr> {
        let hdr = L1ctlHdr::from_msgbuf(buf)?;
        match hdr.msg_type {
            L1ctlMsgType::RachReq => rach::handle_rach_req(&self.state, &mut self.sched, buf),
            L1ctlMsgType::PmReq => {
                let frames = pm::handle_pm_req(&self.state.pm, buf)?;
                for frame in frames {
                    self.send_to_l23(&frame, "pm conf");
                }
                Ok(())
            }
            L1ctlMsgType::EchoReq => {
                let mut msg = L1ctlMsg::new(L1ctlMsgType::EchoConf);
                msg.buf_mut().write_bytes(buf.rest());
                self.send_to_l23(&msg.finish(), "echo conf");
                Ok(())
            }
            L1ctlMsgType::ResetReq => {
                let req = ResetReq::from_msgbuf(buf)?;
                tracing::info!("reset requested (kind {}), restarting local timeline", req.kind);
                self.state.reset();
                let mut msg = L1ctlMsg::new(L1ctlMsgType::ResetConf);
                req.to_msgbuf(msg.buf_mut());
                self.send_to_l23(&msg.finish(), "reset conf");
                Ok(())
            }
            L1ctlMsgType::DmEstReq => {
                let req = DmEstReq::from_msgbuf(buf)?;
                tracing::debug!(
                    "dedicated channel assigned: chan_nr {:#04x} ts {} arfcn {}",
                    req.chan_nr,
                    req.timeslot(),
                    req.band_arfcn
                );
                self.state.dedicated = Some(DedicatedChannel {
                    chan_nr: req.chan_nr,
                    timeslot: req.timeslot(),
                    tsc: req.tsc,
                    hopping: req.h != 0,
                });
                self.state.sync_state = MsSyncState::Dedicated;
                Ok(())
            }
            L1ctlMsgType::DmRelReq => {
                tracing::debug!("dedicated channel released");
                self.state.dedicated = None;
                self.state.sync_state = MsSyncState::IdleCamping;
                Ok(())
            }
            L1ctlMsgType::CcchModeReq => {
                let req = CcchModeReq::from_msgbuf(buf)?;
                tracing::debug!("serving cell ccch mode set to {:?}", req.ccch_mode);
                self.state.serving_cell.ccch_mode = req.ccch_mode;
                let mut msg = L1ctlMsg::new(L1ctlMsgType::CcchModeConf);
                req.to_msgbuf(msg.buf_mut());
                self.send_to_l23(&msg.finish(), "ccch mode conf");
                Ok(())
            }
            other => {
                tracing::warn!("no handler for {:?}, message dropped", other);
                Err(PduParseErr::InvalidMsgType { found: other.into_raw() })
            }
        }
    }

    /// Drain pending bursts from the virtual medium. Each one refreshes the
    /// downlink time and the power estimate for its carrier; the burst
    /// contents themselves are the data-channel path, outside this engine.
    fn service_medium(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.medium_rx.try_recv() {
            self.state.set_downlink_time(GsmTime::from_fn(event.frame_nr));
            self.state.pm.set_sig_strength(Arfcn::new(event.band_arfcn), event.sig_lev_dbm, now);
        }
    }

    /// Advance local time by one frame, then fire every scheduled action
    /// whose target has been reached, before returning to the caller.
    fn advance_time(&mut self) {
        let now = self.state.advance_frame();
        for entry in self.sched.take_due(now) {
            self.fire(entry);
        }
    }

    fn fire(&mut self, entry: SchedEntry<SchedWork>) {
        match entry.payload {
            SchedWork::RachTx(burst) => self.fire_rach(&burst, entry.timeslot),
        }
    }

    /// Send the access burst to the medium, then confirm to the upper layer
    /// with the frame number and carrier actually used.
    fn fire_rach(&mut self, burst: &RachBurst, timeslot: u8) {
        let arfcn = self.state.serving_cell.arfcn;
        self.medium.transmit(&[burst.ra], arfcn, timeslot);

        let frame_nr = self.state.current_time().frame_number();
        tracing::debug!("rach sent on fn {} arfcn {}, confirming to l23", frame_nr, arfcn);
        let msg = create_l2_msg(L1ctlMsgType::RachConf, frame_nr, 0, arfcn.value());
        self.send_to_l23(&msg.finish(), "rach conf");
    }

    fn send_to_l23(&mut self, frame: &[u8], what: &str) {
        match self.server.send(frame) {
            Ok(()) => {}
            Err(L1ctlError::SendNoConnection) => {
                tracing::debug!("{} dropped, no control connection", what);
            }
            Err(e) => tracing::warn!("{} send failed: {}", what, e),
        }
    }
}
