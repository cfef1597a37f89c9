use std::io;
use std::path::Path;

use nvmeconf_queues::{
    ArtifactStore, ControllerInfo, DmaAllocator, ExchangeContext, HardwareQueues,
    DEFAULT_CMD_WAIT,
};
use nvmeconf_registers::RegisterAccess;

/// Informational snapshot of kernel-side driver metrics. Captured once per
/// test for the audit trail; never gates a verdict.
pub trait KernelMetrics {
    fn dump_kernel_metrics(&self, path: &Path) -> io::Result<()>;
}

/// The harness environment, constructed once at startup and threaded
/// explicitly through every test. Single-instance semantics without hidden
/// global state.
pub struct TestContext<'a> {
    pub regs: &'a mut dyn RegisterAccess,
    pub queues: &'a mut dyn HardwareQueues,
    pub dma: &'a mut dyn DmaAllocator,
    pub info: &'a dyn ControllerInfo,
    pub artifacts: &'a dyn ArtifactStore,
    pub metrics: &'a dyn KernelMetrics,
    /// Whether interrupts are globally enabled on the controller; exchanges
    /// only enforce IRQ accounting when they are.
    pub irqs_enabled: bool,
}

impl<'a> TestContext<'a> {
    /// Exchange context for one submit/reap call under the default deadline.
    pub fn exchange<'s>(
        &self,
        group: &'s str,
        test: &'s str,
        qualifier: &'s str,
    ) -> ExchangeContext<'s> {
        ExchangeContext {
            group,
            test,
            qualifier,
            wait: DEFAULT_CMD_WAIT,
            irqs_enabled: self.irqs_enabled,
        }
    }
}
