// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board collaborators supplied by the BSP.
//!
//! Clock setup must run before anything else touches the board; pin
//! setup waits until after the data/bss fixup so that board writes to
//! globals survive it.

extern "C" {
    fn bl_init_clks();
    fn bl_init_ports();
}

pub fn init_clks() {
    // SAFETY: no-argument board hook, called once from bootstrap.
    unsafe { bl_init_clks() }
}

pub fn init_ports() {
    // SAFETY: no-argument board hook, called once from bootstrap.
    unsafe { bl_init_ports() }
}
