/// Backing-memory strategy of an established hardware queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Single physically contiguous allocation.
    Contiguous,
    /// Scatter-gather backing exercised to test discontiguous queue support.
    Discontiguous,
}

/// Opaque descriptor for a DMA-capable buffer produced by the external
/// allocator. The harness never touches the memory itself; it only hands the
/// descriptor to the queue-creation transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaBuffer {
    /// Allocator-assigned token identifying the allocation.
    pub token: u64,
    pub len: usize,
    /// Offset of the queue's first entry within the first page.
    pub first_page_offset: usize,
}

/// Handle to an established hardware submission queue.
///
/// Exclusively owned by the test group that created it; later tests within
/// the group retrieve the *same* handle through the registry lookup, never an
/// independent copy with its own lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqHandle {
    pub id: u16,
    pub entries: u32,
    /// Entry size in bytes, derived from the controller's reported SQES field.
    pub entry_size: usize,
    pub backing: Backing,
    /// Id of the completion queue this SQ posts to.
    pub cqid: u16,
}

/// Handle to an established hardware completion queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqHandle {
    pub id: u16,
    pub entries: u32,
    pub entry_size: usize,
    pub backing: Backing,
    pub irq_enabled: bool,
}

/// Pending-entry count and interrupt-counter sample for a completion queue,
/// taken together by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSnapshot {
    /// Completion entries present but not yet reaped.
    pub entries: u32,
    /// Monotonic interrupt count observed on this queue's vector.
    pub isr_count: u32,
}
