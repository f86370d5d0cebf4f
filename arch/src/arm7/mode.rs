//! Scoped access to another mode's banked registers.

use crate::arm7::psr::Psr;
use core::arch::asm;

/// Borrows the banked registers of the mode carried in a saved status
/// word by rewriting the CPSR control bits, and puts the original
/// mode back on every exit path.
///
/// Only the mode and interrupt-mask bits change while the scope is
/// alive; general registers are untouched, so the handler's own state
/// survives the round trip.
pub struct ModeScope {
    restore: Psr,
}

impl ModeScope {
    /// # Safety
    ///
    /// Must run in a privileged mode, and `target` must carry a valid
    /// mode field. The borrowed mode's SP is live while the scope is
    /// held, so the caller must not grow the stack inside it.
    #[inline(always)]
    pub unsafe fn enter(target: Psr) -> Self {
        let restore = Psr::current();
        asm!("msr cpsr_c, {}", in(reg) target.bits(), options(nomem, nostack));
        Self { restore }
    }

    /// Link register of the borrowed mode.
    #[inline(always)]
    pub fn lr(&self) -> u32 {
        let r: u32;
        // SAFETY: plain register move.
        unsafe { asm!("mov {}, lr", out(reg) r, options(nomem, nostack, preserves_flags)) };
        r
    }

    /// Stack pointer of the borrowed mode.
    #[inline(always)]
    pub fn sp(&self) -> u32 {
        let r: u32;
        // SAFETY: plain register move.
        unsafe { asm!("mov {}, sp", out(reg) r, options(nomem, nostack, preserves_flags)) };
        r
    }
}

impl Drop for ModeScope {
    #[inline(always)]
    fn drop(&mut self) {
        // SAFETY: writes back the control bits captured at entry.
        unsafe { asm!("msr cpsr_c, {}", in(reg) self.restore.bits(), options(nomem, nostack)) };
    }
}
