//! Abort-class fault reporting.

use crate::arm7::psr::Psr;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

/// Which exception vector trapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Undefined,
    PrefetchAbort,
    DataAbort,
}

impl FaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaultKind::Undefined => "undef",
            FaultKind::PrefetchAbort => "pabt",
            FaultKind::DataAbort => "data",
        }
    }
}

/// One-shot guard around fault reporting.
///
/// Set by the first abort-class handler that runs and never cleared.
/// Emitting the diagnostic may itself fault (the console may be the
/// very peripheral that died), and the second trap must not recurse
/// into logging: the first report is authoritative, later faults are
/// absorbed in silence.
pub struct AbortLatch(AtomicBool);

impl AbortLatch {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Returns `true` exactly once over the lifetime of the image.
    pub fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The process-wide latch. Exception entry already implies mutual
/// exclusion with whatever it interrupted, so the atomic enforces the
/// write-once discipline, not locking.
pub static ABORT_LATCH: AbortLatch = AbortLatch::new();

/// Distance from the hardware-banked return address back to the
/// instruction that trapped. Undef, prefetch-abort and data-abort all
/// bank an address ahead of the faulting instruction on this core.
pub const FAULT_LR_OFFSET: u32 = 8;

/// Corrects a banked return address to the faulting instruction.
pub fn fault_address(banked_lr: u32) -> u32 {
    banked_lr.wrapping_sub(FAULT_LR_OFFSET)
}

/// Everything we can still say about a fault, gathered before the
/// handler parks the core. Lives on the abort stack just long enough
/// to be formatted.
pub struct FaultRecord {
    pub kind: FaultKind,
    /// Corrected address of the faulting instruction.
    pub fault_addr: u32,
    /// Word stored at `fault_addr`.
    pub fault_insn: u32,
    /// Link register of the mode the fault interrupted.
    pub origin_lr: u32,
    /// Word stored at `origin_lr`.
    pub origin_insn: u32,
    /// Saved status of the interrupted mode.
    pub origin_psr: Psr,
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#!{} abort at 0x{:08X} (0x{:08X}) originating from 0x{:08X} (0x{:08X}) in mode {}",
            self.kind.as_str(),
            self.fault_addr,
            self.fault_insn,
            self.origin_lr,
            self.origin_insn,
            self.origin_psr,
        )
    }
}

/// Reconstructs where the fault came from and emits the one
/// diagnostic line, then returns to the caller, which halts.
///
/// The caller has already taken [`ABORT_LATCH`]; nothing in here has
/// an error path of its own. A fault raised by the sink itself is
/// caught by the latch in the next handler invocation, not here.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub(crate) fn report_origin(kind: FaultKind, fault_addr: *const u32) {
    use crate::arm7::mode::ModeScope;

    let spsr = Psr::saved();
    let origin_lr = {
        // SAFETY: we run in a privileged exception mode and the SPSR
        // carries the (valid) mode that was live when the fault hit.
        let scope = unsafe { ModeScope::enter(spsr) };
        scope.lr()
    };

    // SAFETY: both addresses come out of live registers; reading the
    // words behind them can at worst re-fault, which the latch absorbs.
    let (fault_insn, origin_insn) = unsafe {
        (
            fault_addr.read_volatile(),
            (origin_lr as *const u32).read_volatile(),
        )
    };

    let record = FaultRecord {
        kind,
        fault_addr: fault_addr as u32,
        fault_insn,
        origin_lr,
        origin_insn,
        origin_psr: spsr,
    };
    log::error!("{}", record);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_is_clear_at_load() {
        let latch = AbortLatch::new();
        assert!(!latch.is_set());
    }

    #[test]
    fn latch_fires_exactly_once_and_stays_set() {
        let latch = AbortLatch::new();
        assert!(latch.try_acquire());
        assert!(latch.is_set());
        assert!(!latch.try_acquire());
        assert!(!latch.try_acquire());
        assert!(latch.is_set());
    }

    #[test]
    fn second_abort_reaches_no_sink() {
        // Two back-to-back synthetic data aborts; only the first may
        // reach the diagnostic sink.
        let latch = AbortLatch::new();
        let mut reports = 0;
        for _ in 0..2 {
            if latch.try_acquire() {
                reports += 1;
            }
        }
        assert_eq!(reports, 1);
    }

    #[test]
    fn return_address_correction() {
        assert_eq!(fault_address(0x0000_8010), 0x0000_8008);
        assert_eq!(fault_address(FAULT_LR_OFFSET), 0);
    }

    #[test]
    fn classifier_strings() {
        assert_eq!(FaultKind::Undefined.as_str(), "undef");
        assert_eq!(FaultKind::PrefetchAbort.as_str(), "pabt");
        assert_eq!(FaultKind::DataAbort.as_str(), "data");
    }

    #[test]
    fn record_renders_one_line() {
        let record = FaultRecord {
            kind: FaultKind::DataAbort,
            fault_addr: 0x0000_8008,
            fault_insn: 0xE590_0000,
            origin_lr: 0x0000_7F40,
            origin_insn: 0xE92D_4010,
            origin_psr: Psr::from_bits(0x6000_0013),
        };
        assert_eq!(
            record.to_string(),
            "#!data abort at 0x00008008 (0xE5900000) originating from 0x00007F40 (0xE92D4010) in mode 0x60000013 [svc]"
        );
    }
}
