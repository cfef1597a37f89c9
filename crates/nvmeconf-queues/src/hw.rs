use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::handles::{CqHandle, DmaBuffer, PendingSnapshot, SqHandle};
use crate::status::CmdStatus;

/// Failures surfaced by the hardware-queue transport and its registry.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("creation of {kind} {id} failed: {detail}")]
    Create {
        kind: &'static str,
        id: u16,
        detail: String,
    },

    #[error("no queue registered under group id {0:?}")]
    NotRegistered(String),

    #[error("DMA allocation of {len} bytes failed: {detail}")]
    DmaAlloc { len: usize, detail: String },

    #[error("queue transport failure: {0}")]
    Transport(String),
}

/// Kernel-mediated hardware queue operations.
///
/// Creation registers the new handle under a caller-supplied group id so
/// later tests in the same group can retrieve it instead of re-provisioning.
/// Completion queues must exist before a submission queue can target them;
/// the transport rejects an SQ whose `cqid` is unknown.
pub trait HardwareQueues {
    fn create_contig_cq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        irq_enabled: bool,
        group: &str,
    ) -> Result<CqHandle, QueueError>;

    fn create_contig_sq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        cqid: u16,
        group: &str,
    ) -> Result<SqHandle, QueueError>;

    fn create_discontig_cq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        irq_enabled: bool,
        group: &str,
        backing: DmaBuffer,
    ) -> Result<CqHandle, QueueError>;

    fn create_discontig_sq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        cqid: u16,
        group: &str,
        backing: DmaBuffer,
    ) -> Result<SqHandle, QueueError>;

    fn lookup_sq(&self, group: &str) -> Result<SqHandle, QueueError>;
    fn lookup_cq(&self, group: &str) -> Result<CqHandle, QueueError>;

    /// Places the 64-byte command descriptor in the SQ's next slot and
    /// returns the unique command identifier assigned to it. Hardware does
    /// not see the entry until the doorbell rings.
    fn enqueue(&mut self, sq: &SqHandle, descriptor: &[u8; 64]) -> Result<u16, QueueError>;

    /// Advances the SQ tail doorbell. Completion is asynchronous from here on.
    fn ring_doorbell(&mut self, sq: &SqHandle) -> Result<(), QueueError>;

    /// Samples the CQ's pending-entry count and interrupt counter.
    fn pending(&self, cq: &CqHandle) -> Result<PendingSnapshot, QueueError>;

    /// Blocks until at least `min_entries` completion entries are pending or
    /// `deadline` elapses, then returns the snapshot at that moment. A
    /// timeout is not an error at this layer; the caller judges the count.
    fn wait_pending(
        &mut self,
        cq: &CqHandle,
        min_entries: u32,
        deadline: Duration,
    ) -> Result<PendingSnapshot, QueueError>;

    /// Consumes `count` completion entries and returns their status codes.
    fn reap(&mut self, cq: &CqHandle, count: u32) -> Result<Vec<CmdStatus>, QueueError>;

    /// Captures the queue's full contents to `path` for post-mortem
    /// analysis. Evidence only; callers never branch on the dump itself.
    fn dump_sq(&self, sq: &SqHandle, path: &Path, reason: &str) -> Result<(), QueueError>;
    fn dump_cq(&self, cq: &CqHandle, path: &Path, reason: &str) -> Result<(), QueueError>;
}

/// External DMA buffer allocator used for discontiguous queue backing.
pub trait DmaAllocator {
    /// Allocates `len` bytes of scatter-gather backing, offset into the
    /// first page per the queue layout rule.
    fn alloc_first_page_offset(&mut self, len: usize) -> Result<DmaBuffer, QueueError>;
}

/// Informative controller metadata, read once from identify data by an
/// external collaborator.
pub trait ControllerInfo {
    /// Raw CQES field; only the low 4 bits are architecturally valid.
    fn cq_entry_exponent(&self) -> u8;
    /// Raw SQES field; only the low 4 bits are architecturally valid.
    fn sq_entry_exponent(&self) -> u8;
    /// Whether the controller advertises discontiguous (scatter-gather) I/O
    /// queue support.
    fn supports_discontiguous_queues(&self) -> bool;
    /// Reported namespace size (NSZE) in logical blocks, if the namespace
    /// exists.
    fn namespace_size(&self, nsid: u32) -> Option<u64>;
}
