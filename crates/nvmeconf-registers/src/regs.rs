use std::fmt;

use thiserror::Error;

bitflags::bitflags! {
    /// Optional PCI capabilities the controller reports. Which status
    /// registers exist (and therefore which ones the monitor touches)
    /// depends on this set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// PCI Express capability: the device-status register exists.
        const PCI_EXPRESS = 1 << 0;
        /// Advanced Error Reporting capability: the uncorrectable-error
        /// status register exists.
        const ADVANCED_ERROR_REPORTING = 1 << 1;
    }
}

/// Status registers the harness monitors for sticky error indications.
///
/// [`MonitoredRegister::PciStatus`] and [`MonitoredRegister::ControllerStatus`]
/// always exist; the other two only when the matching capability is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoredRegister {
    /// PCI header STS register (16-bit, RW1C error bits).
    PciStatus,
    /// PCI Express capability device-status register (16-bit).
    PciExpressDeviceStatus,
    /// AER uncorrectable-error status register (32-bit).
    AerUncorrectableStatus,
    /// Controller CSTS register in BAR0 (32-bit).
    ControllerStatus,
}

impl MonitoredRegister {
    /// Register width in bits; masks and all-ones writes are sized to this.
    pub fn width_bits(self) -> u32 {
        match self {
            MonitoredRegister::PciStatus | MonitoredRegister::PciExpressDeviceStatus => 16,
            MonitoredRegister::AerUncorrectableStatus | MonitoredRegister::ControllerStatus => 32,
        }
    }

    /// All-ones value for this register's width. Writing it clears every
    /// RW1C bit while leaving RO bits untouched.
    pub fn all_ones(self) -> u64 {
        (1u64 << self.width_bits()) - 1
    }

    pub fn desc(self) -> &'static str {
        match self {
            MonitoredRegister::PciStatus => "PCI status (STS)",
            MonitoredRegister::PciExpressDeviceStatus => "PCI Express device status (PXDS)",
            MonitoredRegister::AerUncorrectableStatus => "AER uncorrectable error status (AERUCES)",
            MonitoredRegister::ControllerStatus => "controller status (CSTS)",
        }
    }
}

impl fmt::Display for MonitoredRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.desc())
    }
}

/// Failures surfaced by the register transport. A failed read during verdict
/// evaluation is itself a test failure and is propagated, never masked.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("read of {reg} failed: {detail}")]
    Read { reg: MonitoredRegister, detail: String },

    #[error("write of {reg} failed: {detail}")]
    Write { reg: MonitoredRegister, detail: String },
}

/// Kernel-mediated access to the monitored registers.
///
/// The harness core never caches values obtained through this trait; each
/// call reflects the hardware state at that moment.
pub trait RegisterAccess {
    fn read(&self, reg: MonitoredRegister) -> Result<u64, RegisterError>;
    fn write(&mut self, reg: MonitoredRegister, value: u64) -> Result<(), RegisterError>;

    /// Optional capabilities the controller reports. Determines which of the
    /// monitored registers are present at all.
    fn capabilities(&self) -> Capabilities;
}
