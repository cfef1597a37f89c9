use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::artifacts::ArtifactStore;
use crate::handles::{CqHandle, SqHandle};
use crate::hw::{HardwareQueues, QueueError};
use crate::status::CmdStatus;

/// Bound on how long one exchange waits for its completion entry.
pub const DEFAULT_CMD_WAIT: Duration = Duration::from_secs(10);

/// A command descriptor plus the completion status the test expects it to
/// finish with. Owned by the test body; the exchange borrows it for one call
/// and never retains it.
///
/// The 64-byte descriptor is opaque here: field encoding belongs to the
/// external command constructors.
#[derive(Debug, Clone)]
pub struct CommandEnvelope {
    /// Short command name used in dump categories (e.g. `"write"`).
    pub name: String,
    pub descriptor: [u8; 64],
    pub expected: CmdStatus,
}

impl CommandEnvelope {
    pub fn new(name: impl Into<String>, descriptor: [u8; 64], expected: CmdStatus) -> Self {
        Self {
            name: name.into(),
            descriptor,
            expected,
        }
    }

    /// Envelope for a command that must complete successfully.
    pub fn expecting_success(name: impl Into<String>, descriptor: [u8; 64]) -> Self {
        Self::new(name, descriptor, CmdStatus::SUCCESS)
    }
}

/// Per-call context for one exchange: dump labeling, deadline, and whether
/// interrupts are globally enabled on the controller.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeContext<'a> {
    pub group: &'a str,
    pub test: &'a str,
    /// Caller-supplied qualifier distinguishing dumps from repeated
    /// exchanges within one test (e.g. `"nsze-1"`).
    pub qualifier: &'a str,
    pub wait: Duration,
    pub irqs_enabled: bool,
}

/// Protocol violations detected during one submit/reap round trip. Each
/// variant that follows a queue dump records where the evidence went.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error(
        "CQ {cqid} held {entries} unreaped entry(ies) before submit; \
         single-outstanding-command precondition violated (dump: {dump:?})"
    )]
    CqNotEmpty {
        cqid: u16,
        entries: u32,
        dump: PathBuf,
    },

    #[error("no completion entry arrived in CQ {cqid} within {waited_ms} ms (dump: {dump:?})")]
    NoCompletion {
        cqid: u16,
        waited_ms: u64,
        dump: PathBuf,
    },

    #[error("1 command produced {entries} completion entries in CQ {cqid} (dump: {dump:?})")]
    CompletionCount {
        cqid: u16,
        entries: u32,
        dump: PathBuf,
    },

    #[error("reap of CQ {cqid} returned no entry")]
    EmptyReap { cqid: u16 },

    #[error("completion status mismatch for cmd {cmd:?}: expected {expected}, got {actual}")]
    StatusMismatch {
        cmd: String,
        expected: CmdStatus,
        actual: CmdStatus,
    },

    #[error("CQ {cqid} uses IRQs but ISR count moved {before} -> {after}, want exactly +1")]
    IrqAccounting { cqid: u16, before: u32, after: u32 },

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Submits one command and reaps exactly one completion entry under the
/// context's deadline.
///
/// Protocol checks, in order:
/// 1. the CQ must be empty before anything is sent (nothing is submitted on
///    violation),
/// 2. exactly one completion entry must arrive before the deadline,
/// 3. its status must equal the envelope's expected status,
/// 4. when the CQ uses interrupts and interrupts are globally enabled, the
///    interrupt counter must advance by exactly one.
///
/// Every failure path captures a queue dump before surfacing the error.
/// There is no retry: a conformance exchange is a single deterministic
/// probe, and retrying would mask a genuine hardware defect.
pub fn submit_and_reap(
    hw: &mut dyn HardwareQueues,
    artifacts: &dyn ArtifactStore,
    ctx: &ExchangeContext<'_>,
    sq: &SqHandle,
    cq: &CqHandle,
    cmd: &CommandEnvelope,
) -> Result<(), ExchangeError> {
    let before = hw.pending(cq)?;
    if before.entries != 0 {
        let dump = artifacts.prep_dump_file(ctx.group, ctx.test, "cq", "notEmpty");
        capture_cq(hw, cq, &dump, "test assumptions have not been met");
        return Err(ExchangeError::CqNotEmpty {
            cqid: cq.id,
            entries: before.entries,
            dump,
        });
    }

    let cid = hw.enqueue(sq, &cmd.descriptor)?;
    tracing::info!(cid, sqid = sq.id, cmd = %cmd.name, "sending cmd to hardware");

    // Snapshot the SQ before ringing the doorbell so the dump shows the
    // state the hardware is about to consume.
    let sq_dump = artifacts.prep_dump_file(ctx.group, ctx.test, &format!("sq.{}", cmd.name), ctx.qualifier);
    capture_sq(hw, sq, &sq_dump, "entire SQ just before ringing doorbell");
    hw.ring_doorbell(sq)?;

    tracing::info!(cqid = cq.id, "waiting for the CE to arrive");
    let after = hw.wait_pending(cq, 1, ctx.wait)?;
    if after.entries == 0 {
        let dump = artifacts.prep_dump_file(ctx.group, ctx.test, &format!("cq.{}", cmd.name), ctx.qualifier);
        capture_cq(hw, cq, &dump, "no CE seen for issued cmd, entire CQ");
        return Err(ExchangeError::NoCompletion {
            cqid: cq.id,
            waited_ms: ctx.wait.as_millis() as u64,
            dump,
        });
    }
    if after.entries != 1 {
        let dump = artifacts.prep_dump_file(ctx.group, ctx.test, &format!("cq.{}", cmd.name), ctx.qualifier);
        capture_cq(hw, cq, &dump, "more CE's than cmds issued, entire CQ");
        return Err(ExchangeError::CompletionCount {
            cqid: cq.id,
            entries: after.entries,
            dump,
        });
    }

    // Post-arrival snapshot for the audit trail before the entry is consumed.
    let cq_dump = artifacts.prep_dump_file(ctx.group, ctx.test, &format!("cq.{}", cmd.name), ctx.qualifier);
    capture_cq(hw, cq, &cq_dump, "entire CQ just before reaping");

    let statuses = hw.reap(cq, 1)?;
    let actual = statuses
        .first()
        .copied()
        .ok_or(ExchangeError::EmptyReap { cqid: cq.id })?;
    if actual != cmd.expected {
        return Err(ExchangeError::StatusMismatch {
            cmd: cmd.name.clone(),
            expected: cmd.expected,
            actual,
        });
    }

    // A single cmd on an empty queue pair must yield exactly one IRQ.
    if ctx.irqs_enabled && cq.irq_enabled && after.isr_count != before.isr_count.wrapping_add(1) {
        return Err(ExchangeError::IrqAccounting {
            cqid: cq.id,
            before: before.isr_count,
            after: after.isr_count,
        });
    }

    Ok(())
}

fn capture_sq(hw: &dyn HardwareQueues, sq: &SqHandle, path: &std::path::Path, reason: &str) {
    if let Err(err) = hw.dump_sq(sq, path, reason) {
        tracing::warn!(sqid = sq.id, "failed to dump SQ: {err}");
    }
}

fn capture_cq(hw: &dyn HardwareQueues, cq: &CqHandle, path: &std::path::Path, reason: &str) {
    if let Err(err) = hw.dump_cq(cq, path, reason) {
        tracing::warn!(cqid = cq.id, "failed to dump CQ: {err}");
    }
}
