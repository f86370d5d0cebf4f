//! ARM7 (ARMv4T) hardware support.

pub mod fault;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod mode;
pub mod psr;
