use core::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum PduParseErr {
    BufferEnded { field: Option<&'static str> },
    InvalidValue { field: &'static str, value: u64 },
    InvalidMsgType { found: u8 },
    InconsistentLength { expected: usize, found: usize },
}

impl fmt::Display for PduParseErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PduParseErr::BufferEnded { field } => {
                write!(f, "buffer ended while reading {}", field.unwrap_or("<unnamed>"))
            }
            PduParseErr::InvalidValue { field, value } => {
                write!(f, "invalid value {} for field {}", value, field)
            }
            PduParseErr::InvalidMsgType { found } => {
                write!(f, "unrecognized message type {:#04x}", found)
            }
            PduParseErr::InconsistentLength { expected, found } => {
                write!(f, "inconsistent length: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for PduParseErr {}
