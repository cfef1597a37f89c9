#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::time::Duration;

use nvmeconf_queues::{
    Backing, CmdStatus, ControllerInfo, CqHandle, DmaAllocator, DmaBuffer, HardwareQueues,
    PendingSnapshot, QueueError, SqHandle,
};

/// What the fake controller does when the doorbell rings.
pub enum Arrival {
    /// Post these completion entries and (unless suppressed) one interrupt.
    Complete(Vec<CmdStatus>),
    /// Post nothing; the exchange's wait will observe zero entries.
    Timeout,
}

/// Scripted in-memory stand-in for the kernel queue transport. One I/O queue
/// pair is enough for the harness core tests.
pub struct FakeHw {
    registry_sq: HashMap<String, SqHandle>,
    registry_cq: HashMap<String, CqHandle>,
    pub script: VecDeque<Arrival>,
    pub submitted: Vec<(u16, [u8; 64])>,
    pub doorbells: u32,
    pub wait_calls: u32,
    pub pending: Vec<CmdStatus>,
    pub isr_count: u32,
    /// When set, completions arrive without advancing the interrupt counter
    /// (models broken IRQ accounting).
    pub suppress_irq: bool,
    /// Creation order and shape, e.g. `"discontig_cq id=1 backing=64"`.
    pub created: Vec<String>,
    next_cid: u16,
}

impl FakeHw {
    pub fn new() -> Self {
        Self {
            registry_sq: HashMap::new(),
            registry_cq: HashMap::new(),
            script: VecDeque::new(),
            submitted: Vec::new(),
            doorbells: 0,
            wait_calls: 0,
            pending: Vec::new(),
            isr_count: 0,
            suppress_irq: false,
            created: Vec::new(),
            next_cid: 0,
        }
    }

    pub fn push_arrival(&mut self, arrival: Arrival) {
        self.script.push_back(arrival);
    }

    fn snapshot(&self) -> PendingSnapshot {
        PendingSnapshot {
            entries: self.pending.len() as u32,
            isr_count: self.isr_count,
        }
    }
}

impl HardwareQueues for FakeHw {
    fn create_contig_cq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        irq_enabled: bool,
        group: &str,
    ) -> Result<CqHandle, QueueError> {
        let cq = CqHandle {
            id,
            entries,
            entry_size,
            backing: Backing::Contiguous,
            irq_enabled,
        };
        self.created.push(format!("contig_cq id={id}"));
        self.registry_cq.insert(group.to_string(), cq.clone());
        Ok(cq)
    }

    fn create_contig_sq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        cqid: u16,
        group: &str,
    ) -> Result<SqHandle, QueueError> {
        if !self.registry_cq.values().any(|cq| cq.id == cqid) {
            return Err(QueueError::Create {
                kind: "IOSQ",
                id,
                detail: format!("target CQ {cqid} does not exist"),
            });
        }
        let sq = SqHandle {
            id,
            entries,
            entry_size,
            backing: Backing::Contiguous,
            cqid,
        };
        self.created.push(format!("contig_sq id={id}"));
        self.registry_sq.insert(group.to_string(), sq.clone());
        Ok(sq)
    }

    fn create_discontig_cq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        irq_enabled: bool,
        group: &str,
        backing: DmaBuffer,
    ) -> Result<CqHandle, QueueError> {
        let cq = CqHandle {
            id,
            entries,
            entry_size,
            backing: Backing::Discontiguous,
            irq_enabled,
        };
        self.created
            .push(format!("discontig_cq id={id} backing={}", backing.len));
        self.registry_cq.insert(group.to_string(), cq.clone());
        Ok(cq)
    }

    fn create_discontig_sq(
        &mut self,
        id: u16,
        entries: u32,
        entry_size: usize,
        cqid: u16,
        group: &str,
        backing: DmaBuffer,
    ) -> Result<SqHandle, QueueError> {
        if !self.registry_cq.values().any(|cq| cq.id == cqid) {
            return Err(QueueError::Create {
                kind: "IOSQ",
                id,
                detail: format!("target CQ {cqid} does not exist"),
            });
        }
        let sq = SqHandle {
            id,
            entries,
            entry_size,
            backing: Backing::Discontiguous,
            cqid,
        };
        self.created
            .push(format!("discontig_sq id={id} backing={}", backing.len));
        self.registry_sq.insert(group.to_string(), sq.clone());
        Ok(sq)
    }

    fn lookup_sq(&self, group: &str) -> Result<SqHandle, QueueError> {
        self.registry_sq
            .get(group)
            .cloned()
            .ok_or_else(|| QueueError::NotRegistered(group.to_string()))
    }

    fn lookup_cq(&self, group: &str) -> Result<CqHandle, QueueError> {
        self.registry_cq
            .get(group)
            .cloned()
            .ok_or_else(|| QueueError::NotRegistered(group.to_string()))
    }

    fn enqueue(&mut self, sq: &SqHandle, descriptor: &[u8; 64]) -> Result<u16, QueueError> {
        self.submitted.push((sq.id, *descriptor));
        let cid = self.next_cid;
        self.next_cid = self.next_cid.wrapping_add(1);
        Ok(cid)
    }

    fn ring_doorbell(&mut self, _sq: &SqHandle) -> Result<(), QueueError> {
        self.doorbells += 1;
        match self.script.pop_front() {
            Some(Arrival::Complete(statuses)) => {
                self.pending.extend(statuses);
                if !self.suppress_irq {
                    self.isr_count += 1;
                }
            }
            Some(Arrival::Timeout) | None => {}
        }
        Ok(())
    }

    fn pending(&self, _cq: &CqHandle) -> Result<PendingSnapshot, QueueError> {
        Ok(self.snapshot())
    }

    fn wait_pending(
        &mut self,
        _cq: &CqHandle,
        _min_entries: u32,
        _deadline: Duration,
    ) -> Result<PendingSnapshot, QueueError> {
        self.wait_calls += 1;
        Ok(self.snapshot())
    }

    fn reap(&mut self, _cq: &CqHandle, count: u32) -> Result<Vec<CmdStatus>, QueueError> {
        let take = (count as usize).min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }

    fn dump_sq(&self, sq: &SqHandle, path: &Path, reason: &str) -> Result<(), QueueError> {
        fs::write(path, format!("SQ {} dump\n{reason}\n", sq.id))
            .map_err(|err| QueueError::Transport(format!("dump write failed: {err}")))
    }

    fn dump_cq(&self, cq: &CqHandle, path: &Path, reason: &str) -> Result<(), QueueError> {
        fs::write(path, format!("CQ {} dump\n{reason}\n", cq.id))
            .map_err(|err| QueueError::Transport(format!("dump write failed: {err}")))
    }
}

pub struct FakeInfo {
    pub cqes: u8,
    pub sqes: u8,
    pub discontig: bool,
    pub nsze: u64,
}

impl ControllerInfo for FakeInfo {
    fn cq_entry_exponent(&self) -> u8 {
        self.cqes
    }

    fn sq_entry_exponent(&self) -> u8 {
        self.sqes
    }

    fn supports_discontiguous_queues(&self) -> bool {
        self.discontig
    }

    fn namespace_size(&self, nsid: u32) -> Option<u64> {
        (nsid == 1).then_some(self.nsze)
    }
}

pub struct FakeDma {
    next_token: u64,
    pub allocs: Vec<usize>,
}

impl FakeDma {
    pub fn new() -> Self {
        Self {
            next_token: 1,
            allocs: Vec::new(),
        }
    }
}

impl DmaAllocator for FakeDma {
    fn alloc_first_page_offset(&mut self, len: usize) -> Result<DmaBuffer, QueueError> {
        let token = self.next_token;
        self.next_token += 1;
        self.allocs.push(len);
        Ok(DmaBuffer {
            token,
            len,
            first_page_offset: 0,
        })
    }
}
