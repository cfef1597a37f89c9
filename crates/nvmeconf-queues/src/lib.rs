//! Hardware queue provisioning and the submit/reap command protocol.
//!
//! Conformance tests drive the controller through submission/completion
//! queue pairs. This crate owns the two protocol-heavy pieces:
//!
//! - [`provision::create_queue_pair`]: establishes an SQ/CQ pair at a
//!   caller-chosen id, honoring the controller's reported entry-size fields
//!   and the caller's contiguous/discontiguous backing choice.
//! - [`exchange::submit_and_reap`]: one strict round trip of "submit command,
//!   ring doorbell, observe exactly one completion, validate status and IRQ
//!   accounting", with a diagnostic dump captured before every failure path.
//!
//! The actual hardware transport (queue creation ioctls, doorbell writes,
//! reaping) is consumed through the [`hw::HardwareQueues`] trait; diagnostic
//! artifacts go through [`artifacts::ArtifactStore`]. Both have fake
//! implementations in tests.

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod exchange;
pub mod hw;
pub mod provision;

mod handles;
mod status;

pub use artifacts::{ArtifactStore, DumpDir};
pub use exchange::{
    submit_and_reap, CommandEnvelope, ExchangeContext, ExchangeError, DEFAULT_CMD_WAIT,
};
pub use handles::{Backing, CqHandle, DmaBuffer, PendingSnapshot, SqHandle};
pub use hw::{ControllerInfo, DmaAllocator, HardwareQueues, QueueError};
pub use provision::{create_queue_pair, BackingChoice, QueueGroupIds, QueuePairSpec};
pub use status::CmdStatus;
