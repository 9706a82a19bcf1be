use vphy_core::pdu_parse_error::PduParseErr;

/// L1CTL message types carried in the common header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1ctlMsgType {
    FbsbReq = 1,
    FbsbConf = 2,
    DataInd = 3,
    RachReq = 4,
    DmEstReq = 5,
    DataReq = 6,
    ResetInd = 7,
    PmReq = 8,
    PmConf = 9,
    EchoReq = 10,
    EchoConf = 11,
    RachConf = 12,
    ResetReq = 13,
    ResetConf = 14,
    DmRelReq = 15,
    CcchModeReq = 16,
    CcchModeConf = 17,
}

impl L1ctlMsgType {
    pub fn from_raw(raw: u8) -> Result<L1ctlMsgType, PduParseErr> {
        match raw {
            1 => Ok(L1ctlMsgType::FbsbReq),
            2 => Ok(L1ctlMsgType::FbsbConf),
            3 => Ok(L1ctlMsgType::DataInd),
            4 => Ok(L1ctlMsgType::RachReq),
            5 => Ok(L1ctlMsgType::DmEstReq),
            6 => Ok(L1ctlMsgType::DataReq),
            7 => Ok(L1ctlMsgType::ResetInd),
            8 => Ok(L1ctlMsgType::PmReq),
            9 => Ok(L1ctlMsgType::PmConf),
            10 => Ok(L1ctlMsgType::EchoReq),
            11 => Ok(L1ctlMsgType::EchoConf),
            12 => Ok(L1ctlMsgType::RachConf),
            13 => Ok(L1ctlMsgType::ResetReq),
            14 => Ok(L1ctlMsgType::ResetConf),
            15 => Ok(L1ctlMsgType::DmRelReq),
            16 => Ok(L1ctlMsgType::CcchModeReq),
            17 => Ok(L1ctlMsgType::CcchModeConf),
            other => Err(PduParseErr::InvalidMsgType { found: other }),
        }
    }

    pub fn into_raw(self) -> u8 {
        self as u8
    }
}
