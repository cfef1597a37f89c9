//! Controller/PCI status register model for the conformance harness.
//!
//! Every test verdict in the harness is ultimately decided by diffing a small
//! set of sticky error-status registers against a per-test allowed-error mask.
//! This crate owns that logic:
//!
//! - [`MonitoredRegister`]: the registers whose error bits gate a verdict.
//! - [`RegisterAccess`]: the kernel-mediated register transport, consumed as a
//!   trait so tests can run against fake register files.
//! - [`RegisterHealthMonitor`]: clears sticky error bits before a test body
//!   runs and afterwards decides whether any *unexpected* error bit latched.
//!
//! Register values are never cached between calls; every evaluation reads the
//! hardware afresh.

#![forbid(unsafe_code)]

mod monitor;
mod regs;


pub use monitor::{first_mismatch_bit, ErrorMask, RegisterHealthMonitor};
pub use regs::{Capabilities, MonitoredRegister, RegisterAccess, RegisterError};
