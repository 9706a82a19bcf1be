/// CCCH configuration of a cell.
///
/// Combined means the RACH shares the 51-multiframe with SDCCH/other
/// control channels; non-combined means the uplink is RACH only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CcchMode {
    #[default]
    None,
    NonCombined,
    Combined,
}

impl CcchMode {
    pub fn from_raw(raw: u8) -> Option<CcchMode> {
        match raw {
            0 => Some(CcchMode::None),
            1 => Some(CcchMode::NonCombined),
            2 => Some(CcchMode::Combined),
            _ => None,
        }
    }

    pub fn into_raw(self) -> u8 {
        match self {
            CcchMode::None => 0,
            CcchMode::NonCombined => 1,
            CcchMode::Combined => 2,
        }
    }
}
