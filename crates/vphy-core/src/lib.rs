//! Core utilities for the GSM virtual PHY
//!
//! This crate provides fundamental types used across the virtual Layer 1:
//! - GsmTime for TDMA frame timing
//! - Arfcn carrier identifier with flag-bit stripping
//! - dBm/rxlev power scale conversions
//! - MsgBuf for byte-level message parsing and construction
//! - Common debug utilities

pub mod arfcn;
pub mod chan;
pub mod debug;
pub mod gsm_time;
pub mod msgbuf;
pub mod pdu_parse_error;
pub mod power;

// Re-export commonly used items
pub use arfcn::{Arfcn, ARFCN_RANGE};
pub use chan::CcchMode;
pub use gsm_time::{GsmTime, FRAME_DURATION_US, GSM_MAX_FN};
pub use msgbuf::MsgBuf;
pub use pdu_parse_error::PduParseErr;
pub use power::{dbm2rxlev, rxlev2dbm, MIN_SIG_LEV_DBM};
