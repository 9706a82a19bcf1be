use std::sync::Arc;

use vphy_core::chan::CcchMode;
use vphy_core::ARFCN_RANGE;

/// Default well-known path for the L1CTL control socket, as expected by the
/// upper-layer stack.
pub const DEFAULT_L1CTL_SOCKET_PATH: &str = "/tmp/osmocom_l2";

/// Control-socket configuration
#[derive(Debug, Clone)]
pub struct CfgL1ctl {
    /// Path of the unix domain socket the upper-layer stack connects to
    pub socket_path: String,
}

impl Default for CfgL1ctl {
    fn default() -> Self {
        Self { socket_path: DEFAULT_L1CTL_SOCKET_PATH.to_string() }
    }
}

/// Power-measurement configuration
#[derive(Debug, Clone)]
pub struct CfgPowerMeasure {
    /// Milliseconds after the last burst on a carrier before its measured
    /// level decays back to the worst possible value. 0 disables decay.
    pub decay_timeout_ms: u64,
}

impl Default for CfgPowerMeasure {
    fn default() -> Self {
        Self { decay_timeout_ms: 0 }
    }
}

/// Initial serving-cell parameters. Normally overwritten later by cell
/// synchronization, which is outside this engine.
#[derive(Debug, Clone)]
pub struct CfgCell {
    pub arfcn: u16,
    pub bsic: u8,
    pub ccch_mode: CcchMode,
}

impl Default for CfgCell {
    fn default() -> Self {
        Self { arfcn: 0, bsic: 0, ccch_mode: CcchMode::None }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhyConfig {
    pub debug_log: Option<String>,
    pub l1ctl: CfgL1ctl,
    pub pm: CfgPowerMeasure,
    pub cell: CfgCell,
}

impl PhyConfig {
    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.l1ctl.socket_path.is_empty() {
            return Err("l1ctl socket_path must not be empty");
        }
        if self.cell.arfcn as usize >= ARFCN_RANGE {
            return Err("cell arfcn outside the GSM numbering plan");
        }
        Ok(())
    }
}

/// Cheap-to-clone handle on the immutable configuration, passed into every
/// component at construction. Constructed only through `from_config`, which
/// validates first.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    cfg: Arc<PhyConfig>,
}

impl SharedConfig {
    pub fn from_config(cfg: PhyConfig) -> Self {
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid virtual-phy configuration: {}", e),
        }
        Self { cfg: Arc::new(cfg) }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<PhyConfig> {
        Arc::clone(&self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let cfg = PhyConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.l1ctl.socket_path, DEFAULT_L1CTL_SOCKET_PATH);
        assert_eq!(cfg.pm.decay_timeout_ms, 0);
    }

    #[test]
    #[should_panic(expected = "Invalid virtual-phy configuration")]
    fn test_bad_arfcn_rejected() {
        let mut cfg = PhyConfig::default();
        cfg.cell.arfcn = 1024;
        SharedConfig::from_config(cfg);
    }
}
