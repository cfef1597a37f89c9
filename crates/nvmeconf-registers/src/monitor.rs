use crate::regs::{Capabilities, MonitoredRegister, RegisterAccess, RegisterError};

/// Per-register bitmasks of error indications a test expects and therefore
/// must not treat as failure. Immutable for the lifetime of the test.
///
/// `Default` allows nothing: any latched error bit fails the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorMask {
    pub sts: u16,
    pub pxds: u16,
    pub aeruces: u32,
    pub csts: u32,
}

impl ErrorMask {
    fn for_register(&self, reg: MonitoredRegister) -> u64 {
        match reg {
            MonitoredRegister::PciStatus => u64::from(self.sts),
            MonitoredRegister::PciExpressDeviceStatus => u64::from(self.pxds),
            MonitoredRegister::AerUncorrectableStatus => u64::from(self.aeruces),
            MonitoredRegister::ControllerStatus => u64::from(self.csts),
        }
    }
}

/// Index of the least-significant bit where `a` and `b` differ, or `None`
/// when they are equal across the full 64-bit width.
///
/// Used only to name the offending bit in failure logs, never for control
/// flow.
pub fn first_mismatch_bit(a: u64, b: u64) -> Option<u32> {
    let diff = a ^ b;
    if diff == 0 {
        None
    } else {
        Some(diff.trailing_zeros())
    }
}

/// Resets sticky hardware error indications before a test body runs and
/// afterwards decides pass/fail by masked comparison against the test's
/// allowed-error configuration.
#[derive(Debug, Clone, Copy)]
pub struct RegisterHealthMonitor {
    mask: ErrorMask,
}

impl RegisterHealthMonitor {
    pub fn new(mask: ErrorMask) -> Self {
        Self { mask }
    }

    /// Writes all-ones to every present error-status register. RW1C bits
    /// clear; RO bits are unaffected. Isolates this test's verdict from
    /// residue left by earlier tests.
    pub fn reset_baseline(&self, regs: &mut dyn RegisterAccess) -> Result<(), RegisterError> {
        tracing::info!("resetting sticky PCI/controller error status");
        let sts = MonitoredRegister::PciStatus;
        regs.write(sts, sts.all_ones())?;

        let caps = regs.capabilities();
        if caps.contains(Capabilities::PCI_EXPRESS) {
            let pxds = MonitoredRegister::PciExpressDeviceStatus;
            regs.write(pxds, pxds.all_ones())?;
        }
        if caps.contains(Capabilities::ADVANCED_ERROR_REPORTING) {
            let aeruces = MonitoredRegister::AerUncorrectableStatus;
            regs.write(aeruces, aeruces.all_ones())?;
        }
        Ok(())
    }

    /// Returns `Ok(false)` as soon as any monitored register carries an error
    /// bit outside the allowed mask; `Ok(true)` when all present registers
    /// are clean. Read failures propagate.
    pub fn evaluate(&self, regs: &dyn RegisterAccess) -> Result<bool, RegisterError> {
        if !self.check_register(regs, MonitoredRegister::PciStatus)? {
            return Ok(false);
        }

        let caps = regs.capabilities();
        if caps.contains(Capabilities::PCI_EXPRESS)
            && !self.check_register(regs, MonitoredRegister::PciExpressDeviceStatus)?
        {
            return Ok(false);
        }
        if caps.contains(Capabilities::ADVANCED_ERROR_REPORTING)
            && !self.check_register(regs, MonitoredRegister::AerUncorrectableStatus)?
        {
            return Ok(false);
        }

        if !self.check_register(regs, MonitoredRegister::ControllerStatus)? {
            return Ok(false);
        }
        Ok(true)
    }

    fn check_register(
        &self,
        regs: &dyn RegisterAccess,
        reg: MonitoredRegister,
    ) -> Result<bool, RegisterError> {
        let value = regs.read(reg)?;
        let allowed = self.mask.for_register(reg);
        let expected = value & !allowed;
        if value != expected {
            // first_mismatch_bit is Some here since value != expected.
            let bit = first_mismatch_bit(value, expected).unwrap_or(0);
            tracing::error!("{reg} error bit #{bit} indicates test failure");
            return Ok(false);
        }
        Ok(true)
    }
}
