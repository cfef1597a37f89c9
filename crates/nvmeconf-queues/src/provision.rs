use crate::handles::{CqHandle, SqHandle};
use crate::hw::{ControllerInfo, DmaAllocator, HardwareQueues, QueueError};

/// Low 4 bits of the reported CQES/SQES fields are the valid entry-size
/// exponent; the rest of each field is reserved.
const ENTRY_SIZE_EXPONENT_MASK: u8 = 0xf;

/// Caller's choice of backing strategy for a new queue pair. The backing
/// memory itself is allocated during provisioning, not supplied up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackingChoice {
    Contiguous,
    Discontiguous,
}

/// Group-registry identifiers the new handles are registered under, so later
/// tests in the same group can look them up instead of re-provisioning.
#[derive(Debug, Clone, Copy)]
pub struct QueueGroupIds<'a> {
    pub sq: &'a str,
    pub cq: &'a str,
}

/// Parameters for one SQ/CQ pair. Both queues share the numeric id.
#[derive(Debug, Clone, Copy)]
pub struct QueuePairSpec {
    pub id: u16,
    pub entries: u32,
    pub irq_enabled: bool,
    pub backing: BackingChoice,
}

/// Establishes a submission/completion queue pair at the requested id.
///
/// Entry sizes for both queue kinds come from the controller's reported
/// capability fields masked down to their valid low-order bits. The CQ is
/// created first: a submission queue cannot target a completion queue that
/// does not exist yet.
///
/// A discontiguous request on a controller that does not advertise
/// discontiguous queue support falls back to contiguous creation. The
/// fallback is decided by this explicit capability check and logged; it is
/// the caller's responsibility not to request it in the first place.
pub fn create_queue_pair(
    hw: &mut dyn HardwareQueues,
    dma: &mut dyn DmaAllocator,
    info: &dyn ControllerInfo,
    groups: QueueGroupIds<'_>,
    spec: &QueuePairSpec,
) -> Result<(SqHandle, CqHandle), QueueError> {
    let cq_entry_size = 1usize << (info.cq_entry_exponent() & ENTRY_SIZE_EXPONENT_MASK);
    let sq_entry_size = 1usize << (info.sq_entry_exponent() & ENTRY_SIZE_EXPONENT_MASK);

    let discontig = spec.backing == BackingChoice::Discontiguous;
    if discontig && !info.supports_discontiguous_queues() {
        tracing::warn!(
            id = spec.id,
            "discontiguous queues requested but not supported; creating contiguous"
        );
    }

    if discontig && info.supports_discontiguous_queues() {
        tracing::info!(id = spec.id, "creating discontiguous IOCQ/IOSQ pair");
        let cq_backing = dma.alloc_first_page_offset(spec.entries as usize * cq_entry_size)?;
        let cq = hw.create_discontig_cq(
            spec.id,
            spec.entries,
            cq_entry_size,
            spec.irq_enabled,
            groups.cq,
            cq_backing,
        )?;

        let sq_backing = dma.alloc_first_page_offset(spec.entries as usize * sq_entry_size)?;
        let sq = hw.create_discontig_sq(
            spec.id,
            spec.entries,
            sq_entry_size,
            cq.id,
            groups.sq,
            sq_backing,
        )?;
        Ok((sq, cq))
    } else {
        tracing::info!(id = spec.id, "creating contiguous IOCQ/IOSQ pair");
        let cq = hw.create_contig_cq(
            spec.id,
            spec.entries,
            cq_entry_size,
            spec.irq_enabled,
            groups.cq,
        )?;
        let sq = hw.create_contig_sq(spec.id, spec.entries, sq_entry_size, cq.id, groups.sq)?;
        Ok((sq, cq))
    }
}
