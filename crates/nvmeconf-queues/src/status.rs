use std::fmt;

/// Completion-entry status: status code type (SCT) plus status code (SC).
///
/// Tests declare the status they expect a command to complete with; an
/// *expected* error status completing as declared is a passing exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmdStatus {
    pub sct: u8,
    pub sc: u8,
}

impl CmdStatus {
    pub const SUCCESS: CmdStatus = CmdStatus::new(0x0, 0x00);
    pub const INVALID_OPCODE: CmdStatus = CmdStatus::new(0x0, 0x01);
    pub const INVALID_FIELD: CmdStatus = CmdStatus::new(0x0, 0x02);
    pub const DATA_TRANSFER_ERROR: CmdStatus = CmdStatus::new(0x0, 0x04);
    pub const INVALID_NAMESPACE: CmdStatus = CmdStatus::new(0x0, 0x0b);
    pub const LBA_OUT_OF_RANGE: CmdStatus = CmdStatus::new(0x0, 0x80);
    pub const CAPACITY_EXCEEDED: CmdStatus = CmdStatus::new(0x0, 0x81);

    pub const fn new(sct: u8, sc: u8) -> Self {
        Self { sct, sc }
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl fmt::Display for CmdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            CmdStatus::SUCCESS => Some("success"),
            CmdStatus::INVALID_OPCODE => Some("invalid opcode"),
            CmdStatus::INVALID_FIELD => Some("invalid field"),
            CmdStatus::DATA_TRANSFER_ERROR => Some("data transfer error"),
            CmdStatus::INVALID_NAMESPACE => Some("invalid namespace"),
            CmdStatus::LBA_OUT_OF_RANGE => Some("LBA out of range"),
            CmdStatus::CAPACITY_EXCEEDED => Some("capacity exceeded"),
            _ => None,
        };
        match name {
            Some(name) => write!(f, "{name} (sct={:#x} sc={:#x})", self.sct, self.sc),
            None => write!(f, "sct={:#x} sc={:#x}", self.sct, self.sc),
        }
    }
}
