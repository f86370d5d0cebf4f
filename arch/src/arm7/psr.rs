//! ARM program status register (CPSR/SPSR) model.

use core::fmt;
use tock_registers::{interfaces::Readable, register_bitfields, LocalRegisterCopy};

register_bitfields![u32,
    pub CPSR [
        /// Processor mode.
        M OFFSET(0) NUMBITS(5) [
            User = 0b10000,
            Fiq = 0b10001,
            Irq = 0b10010,
            Supervisor = 0b10011,
            Abort = 0b10111,
            Undefined = 0b11011,
            System = 0b11111
        ],
        /// Thumb state.
        T OFFSET(5) NUMBITS(1) [],
        /// FIQ mask.
        F OFFSET(6) NUMBITS(1) [],
        /// IRQ mask.
        I OFFSET(7) NUMBITS(1) [],
        V OFFSET(28) NUMBITS(1) [],
        C OFFSET(29) NUMBITS(1) [],
        Z OFFSET(30) NUMBITS(1) [],
        N OFFSET(31) NUMBITS(1) []
    ]
];

/// A captured CPSR or SPSR value.
///
/// Never written back except transiently, control bits only, to reach
/// another mode's banked registers. See [`crate::arm7::mode`].
#[derive(Clone, Copy)]
pub struct Psr(LocalRegisterCopy<u32, CPSR::Register>);

impl Psr {
    pub const fn from_bits(bits: u32) -> Self {
        Self(LocalRegisterCopy::new(bits))
    }

    pub fn bits(self) -> u32 {
        self.0.get()
    }

    pub fn mode(self) -> Option<CPSR::M::Value> {
        self.0.read_as_enum(CPSR::M)
    }

    pub fn mode_name(self) -> &'static str {
        match self.mode() {
            Some(CPSR::M::Value::User) => "usr",
            Some(CPSR::M::Value::Fiq) => "fiq",
            Some(CPSR::M::Value::Irq) => "irq",
            Some(CPSR::M::Value::Supervisor) => "svc",
            Some(CPSR::M::Value::Abort) => "abt",
            Some(CPSR::M::Value::Undefined) => "und",
            Some(CPSR::M::Value::System) => "sys",
            None => "???",
        }
    }

    pub fn irqs_masked(self) -> bool {
        self.0.is_set(CPSR::I)
    }

    pub fn fiqs_masked(self) -> bool {
        self.0.is_set(CPSR::F)
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl Psr {
    /// Read the current mode's CPSR.
    #[inline]
    pub fn current() -> Self {
        let r: u32;
        // SAFETY: Safe register read operation
        unsafe {
            core::arch::asm!("mrs {}, cpsr", out(reg) r, options(nomem, nostack, preserves_flags))
        };
        Self::from_bits(r)
    }

    /// Read the saved status of the mode this exception interrupted.
    ///
    /// Only meaningful from an exception mode; the SPSR of User and
    /// System mode is undefined.
    #[inline]
    pub fn saved() -> Self {
        let r: u32;
        // SAFETY: Safe register read operation
        unsafe {
            core::arch::asm!("mrs {}, spsr", out(reg) r, options(nomem, nostack, preserves_flags))
        };
        Self::from_bits(r)
    }
}

impl fmt::Display for Psr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X} [{}]", self.bits(), self.mode_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_mode() {
        for (bits, name) in [
            (0b10000, "usr"),
            (0b10001, "fiq"),
            (0b10010, "irq"),
            (0b10011, "svc"),
            (0b10111, "abt"),
            (0b11011, "und"),
            (0b11111, "sys"),
        ] {
            assert_eq!(Psr::from_bits(bits).mode_name(), name);
        }
    }

    #[test]
    fn reserved_mode_bits_decode_as_unknown() {
        assert!(Psr::from_bits(0).mode().is_none());
        assert_eq!(Psr::from_bits(0).mode_name(), "???");
    }

    #[test]
    fn interrupt_masks() {
        let p = Psr::from_bits(0xD3); // svc, IRQs and FIQs off
        assert!(p.irqs_masked());
        assert!(p.fiqs_masked());
        assert_eq!(p.mode_name(), "svc");

        let p = Psr::from_bits(0x10);
        assert!(!p.irqs_masked());
        assert!(!p.fiqs_masked());
    }

    #[test]
    fn display_carries_bits_and_mode() {
        assert_eq!(
            Psr::from_bits(0x6000_0013).to_string(),
            "0x60000013 [svc]"
        );
    }
}
