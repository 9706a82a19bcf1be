use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use vphy_core::chan::CcchMode;

use super::stack_config::{CfgCell, CfgL1ctl, CfgPowerMeasure, PhyConfig, SharedConfig};

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.2";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref l1ctl) = root.l1ctl {
        if !l1ctl.extra.is_empty() {
            return Err(format!("Unrecognized fields: l1ctl::{:?}", sorted_keys(&l1ctl.extra)).into());
        }
    }
    if let Some(ref pm) = root.power_measure {
        if !pm.extra.is_empty() {
            return Err(format!("Unrecognized fields: power_measure::{:?}", sorted_keys(&pm.extra)).into());
        }
    }
    if let Some(ref cell) = root.cell_info {
        if !cell.extra.is_empty() {
            return Err(format!("Unrecognized fields: cell_info::{:?}", sorted_keys(&cell.extra)).into());
        }
    }

    // Build config from defaults plus whatever the file provides
    let mut cfg = PhyConfig {
        debug_log: root.debug_log,
        l1ctl: CfgL1ctl::default(),
        pm: CfgPowerMeasure::default(),
        cell: CfgCell::default(),
    };

    if let Some(l1ctl) = root.l1ctl {
        apply_l1ctl_patch(&mut cfg.l1ctl, l1ctl);
    }
    if let Some(pm) = root.power_measure {
        apply_pm_patch(&mut cfg.pm, pm);
    }
    if let Some(cell) = root.cell_info {
        apply_cell_patch(&mut cfg.cell, cell)?;
    }

    if let Err(e) = cfg.validate() {
        return Err(e.to_string().into());
    }
    Ok(SharedConfig::from_config(cfg))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a TOML configuration file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    from_reader(file)
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

fn apply_l1ctl_patch(cfg: &mut CfgL1ctl, dto: L1ctlDto) {
    if let Some(v) = dto.socket_path {
        cfg.socket_path = v;
    }
}

fn apply_pm_patch(cfg: &mut CfgPowerMeasure, dto: PowerMeasureDto) {
    if let Some(v) = dto.decay_timeout_ms {
        cfg.decay_timeout_ms = v;
    }
}

fn apply_cell_patch(cfg: &mut CfgCell, dto: CellInfoDto) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(v) = dto.arfcn {
        cfg.arfcn = v;
    }
    if let Some(v) = dto.bsic {
        cfg.bsic = v;
    }
    if let Some(v) = dto.ccch_mode {
        cfg.ccch_mode = match v.as_str() {
            "None" => CcchMode::None,
            "NonCombined" => CcchMode::NonCombined,
            "Combined" => CcchMode::Combined,
            other => return Err(format!("Unrecognized ccch_mode: {}", other).into()),
        };
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,
    l1ctl: Option<L1ctlDto>,
    power_measure: Option<PowerMeasureDto>,
    cell_info: Option<CellInfoDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct L1ctlDto {
    socket_path: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PowerMeasureDto {
    decay_timeout_ms: Option<u64>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CellInfoDto {
    arfcn: Option<u16>,
    bsic: Option<u8>,
    ccch_mode: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}
