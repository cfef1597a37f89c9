//! Test lifecycle and verdict engine for the NVMe conformance harness.
//!
//! A conformance test is a [`TestBody`] (what to do against the hardware)
//! wrapped in a [`TestCase`] (the fixed lifecycle around it):
//!
//! 1. sticky error-status registers are reset to a clean baseline,
//! 2. a kernel-metrics snapshot is captured for the audit trail,
//! 3. the body runs, driving queues and commands through the collaborators
//!    threaded in via [`TestContext`],
//! 4. the status registers are re-read and diffed against the test's
//!    allowed-error mask to decide the verdict.
//!
//! Every failure inside a body surfaces as [`HarnessError`]; `TestCase::run`
//! is the sole recovery boundary and always returns a plain pass/fail, never
//! propagating further. A failing test does not abort the harness.

#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::{KernelMetrics, TestContext};
pub use error::HarnessError;
pub use test::{TestBody, TestCase, TestMeta, Verdict};

pub use nvmeconf_queues as queues;
pub use nvmeconf_registers as registers;
