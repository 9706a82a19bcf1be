//! Infrastructure for engine integration tests: a full L1Engine on a real
//! unix socket, a recording medium, and framed client I/O helpers.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::Sender;

use vphy_config::{PhyConfig, SharedConfig};
use vphy_core::chan::CcchMode;
use vphy_core::Arfcn;
use vphy_l1::medium::{medium_channel, MediumEvent, VirtualMedium};
use vphy_l1::L1Engine;

/// Records every burst the engine hands to the medium.
#[derive(Clone, Default)]
pub struct RecordingMedium {
    pub sent: Arc<Mutex<Vec<(Vec<u8>, u16, u8)>>>,
}

impl VirtualMedium for RecordingMedium {
    fn transmit(&mut self, burst: &[u8], arfcn: Arfcn, timeslot: u8) {
        self.sent.lock().unwrap().push((burst.to_vec(), arfcn.value(), timeslot));
    }
}

static SOCK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique socket path per test, so suites can run in parallel.
pub fn temp_socket_path(tag: &str) -> String {
    let seq = SOCK_SEQ.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("vphy_test_{}_{}_{}.sock", tag, std::process::id(), seq))
        .to_string_lossy()
        .into_owned()
}

pub fn test_config(tag: &str, ccch_mode: CcchMode, decay_timeout_ms: u64) -> SharedConfig {
    let mut cfg = PhyConfig::default();
    cfg.l1ctl.socket_path = temp_socket_path(tag);
    cfg.pm.decay_timeout_ms = decay_timeout_ms;
    cfg.cell.arfcn = 871;
    cfg.cell.bsic = 63;
    cfg.cell.ccch_mode = ccch_mode;
    SharedConfig::from_config(cfg)
}

pub struct EngineTest {
    pub engine: L1Engine,
    pub medium: RecordingMedium,
    pub medium_tx: Sender<MediumEvent>,
    socket_path: String,
}

impl EngineTest {
    pub fn new(config: SharedConfig) -> Self {
        let socket_path = config.config().l1ctl.socket_path.clone();
        let medium = RecordingMedium::default();
        let (medium_tx, medium_rx) = medium_channel();
        let engine = L1Engine::new(config, Box::new(medium.clone()), medium_rx)
            .expect("engine construction");
        Self { engine, medium, medium_tx, socket_path }
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    /// Connect a client and poll once so the engine accepts it.
    pub fn connect(&mut self) -> UnixStream {
        let client = UnixStream::connect(&self.socket_path).expect("connect to engine socket");
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        self.engine.poll_once();
        assert!(self.engine.has_connection(), "engine did not accept the connection");
        client
    }

    pub fn run_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.engine.poll_once();
        }
    }
}

/// Write one already-framed message in a single write, the way the real
/// stack does.
pub fn send_frame(client: &mut UnixStream, frame: &[u8]) {
    client.write_all(frame).expect("write frame");
}

/// Frame a raw payload with its length prefix and send it.
pub fn send_payload(client: &mut UnixStream, payload: &[u8]) {
    let mut frame = Vec::with_capacity(2 + payload.len());
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(payload);
    send_frame(client, &frame);
}

/// Read one framed message from the engine, returning the payload.
pub fn recv_msg(client: &mut UnixStream) -> Vec<u8> {
    let mut prefix = [0u8; 2];
    client.read_exact(&mut prefix).expect("read length prefix");
    let len = u16::from_be_bytes(prefix) as usize;
    let mut payload = vec![0u8; len];
    client.read_exact(&mut payload).expect("read payload");
    payload
}
