//! GSM virtual Layer 1 engine
//!
//! Drives a real Layer 2/3 protocol stack without radio hardware: an L1CTL
//! control socket towards the upper layers, a frame-number scheduler that
//! turns GSM TDMA timing into deferred actions, and the timing-sensitive
//! primitives built on top (random access, power measurement). Everything
//! runs on a single cooperative event loop.

pub mod auth;
pub mod engine;
pub mod error;
pub mod medium;
pub mod model;
pub mod prims;
pub mod sched;
pub mod transport;

pub use engine::L1Engine;
pub use error::L1ctlError;
pub use medium::{medium_channel, DiscardMedium, MediumEvent, VirtualMedium};
