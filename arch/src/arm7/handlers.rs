use crate::arm7::fault::{self, FaultKind, ABORT_LATCH, FAULT_LR_OFFSET};
use core::arch::naked_asm;
use log::error;

// Classic ARM dispatches exceptions through instructions, not a table
// of function pointers: each slot loads its handler into pc. The
// reset slot targets the external runtime entry; IRQ goes to an
// overridable spin handler.
core::arch::global_asm!(
    r#"
    .section .vector_table,"ax",%progbits
    .global _vector_table
    .type _vector_table, %function
    _vector_table:
        ldr     pc, =_start
        ldr     pc, =Undef_Handler
        ldr     pc, =SWI_Handler
        ldr     pc, =PrefetchAbort_Handler
        ldr     pc, =DataAbort_Handler
        nop
        ldr     pc, =IRQ_Handler
        ldr     pc, =FIQ_Handler
    .size _vector_table, . - _vector_table
    "#
);

fn halt() -> ! {
    #[allow(clippy::empty_loop)]
    loop {}
}

/// Common tail of the abort-class vectors: report once, then park.
fn abort_entry(kind: FaultKind, fault_addr: *const u32) -> ! {
    if ABORT_LATCH.try_acquire() {
        fault::report_origin(kind, fault_addr);
    }
    halt()
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
unsafe extern "C" fn undef_entry(fault_addr: *const u32) -> ! {
    abort_entry(FaultKind::Undefined, fault_addr)
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
unsafe extern "C" fn pabt_entry(fault_addr: *const u32) -> ! {
    abort_entry(FaultKind::PrefetchAbort, fault_addr)
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
unsafe extern "C" fn dabt_entry(fault_addr: *const u32) -> ! {
    abort_entry(FaultKind::DataAbort, fault_addr)
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn Undef_Handler() {
    naked_asm!(
        "sub     r0, lr, #{off}", // address of the trapping instruction
        "b       {entry}",
        off = const FAULT_LR_OFFSET,
        entry = sym undef_entry,
    )
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn PrefetchAbort_Handler() {
    naked_asm!(
        "sub     r0, lr, #{off}", // address of the trapping instruction
        "b       {entry}",
        off = const FAULT_LR_OFFSET,
        entry = sym pabt_entry,
    )
}

#[link_section = ".text.vector_handlers"]
#[no_mangle]
#[unsafe(naked)]
pub unsafe extern "C" fn DataAbort_Handler() {
    naked_asm!(
        "sub     r0, lr, #{off}", // address of the trapping instruction
        "b       {entry}",
        off = const FAULT_LR_OFFSET,
        entry = sym dabt_entry,
    )
}

/// A software interrupt this early is fatal; there is nothing to
/// dispatch to yet.
#[link_section = ".text.vector_handlers"]
#[no_mangle]
pub unsafe extern "C" fn SWI_Handler() {
    error!("Kernel Panic,\nEarly SWI call");
    halt()
}

/// A fast interrupt this early is fatal; nothing has claimed FIQ yet.
#[link_section = ".text.vector_handlers"]
#[no_mangle]
pub unsafe extern "C" fn FIQ_Handler() {
    error!("Kernel Panic,\nEarly FIQ call");
    halt()
}

#[link_section = ".text.vector_handlers"]
#[linkage = "weak"]
#[no_mangle]
pub unsafe extern "C" fn IRQ_Handler() {
    halt()
}
