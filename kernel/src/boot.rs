// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image bootstrap: make RAM match the flashed image before anything
//! else runs.

/// The fixed bring-up order. Clocks come first so the board is clocked
/// for everything after; the data/bss fixup runs before pin setup
/// because board routines may write globals that the fixup would
/// otherwise overwrite with flash contents or zeros.
pub(crate) trait BootPlan {
    fn clocks(&mut self);
    fn memory(&mut self);
    fn pins(&mut self);
    fn ctors(&mut self);
}

pub(crate) fn run<P: BootPlan>(plan: &mut P) {
    plan.clocks();
    plan.memory();
    plan.pins();
    plan.ctors();
}

/// Word-granular forward copy of the initialized-data image from its
/// flash home to its RAM home. The linker script guarantees that all
/// three boundaries are word aligned and correctly ordered; no
/// checking here.
pub(crate) unsafe fn init_data(mut src: *const u32, mut dst: *mut u32, dst_end: *mut u32) {
    while dst < dst_end {
        dst.write(src.read());
        dst = dst.add(1);
        src = src.add(1);
    }
}

/// Word-granular zero fill of the uninitialized-data region.
pub(crate) unsafe fn init_bss(mut dst: *mut u32, dst_end: *mut u32) {
    while dst < dst_end {
        dst.write(0);
        dst = dst.add(1);
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod image {
    use super::BootPlan;
    use crate::boards;
    use core::ptr::{addr_of, addr_of_mut};

    extern "C" {
        static __etext: u32;
        static mut __data_start: u32;
        static mut __data_end: u32;
        static mut __bss_start: u32;
        static mut __bss_end: u32;
    }

    #[cfg(feature = "compat_newlibc")]
    extern "C" {
        fn __libc_init_array();
    }

    /// Production plan: linker boundaries and BSP hooks.
    pub(super) struct Image;

    impl BootPlan for Image {
        fn clocks(&mut self) {
            boards::init_clks();
        }

        fn memory(&mut self) {
            // SAFETY: the boundaries come from the linker script,
            // which word-aligns and orders them; nothing has touched
            // .data or .bss yet.
            unsafe {
                super::init_data(
                    addr_of!(__etext),
                    addr_of_mut!(__data_start),
                    addr_of_mut!(__data_end),
                );
                super::init_bss(addr_of_mut!(__bss_start), addr_of_mut!(__bss_end));
            }
        }

        fn pins(&mut self) {
            boards::init_ports();
        }

        fn ctors(&mut self) {
            // SAFETY: newlib's constructor walker, linked in when the
            // feature is configured.
            #[cfg(feature = "compat_newlibc")]
            unsafe {
                __libc_init_array()
            };
        }
    }
}

/// Image bootstrap. The runtime startup calls this exactly once, with
/// a valid stack and no other memory assumptions.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
pub extern "C" fn bootstrap() {
    run(&mut image::Image);
    // The log facade keeps its state in .bss, so the logger can only
    // go live once the fixup is done.
    crate::logger::init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_copy_is_word_for_word() {
        let src: Vec<u32> = (0..64u32).map(|i| 0xA500_0000 | i).collect();
        let mut dst = vec![0u32; 64];

        let range = dst.as_mut_ptr_range();
        unsafe { init_data(src.as_ptr(), range.start, range.end) };

        assert_eq!(dst, src);
    }

    #[test]
    fn data_copy_stops_at_the_end_boundary() {
        let src: Vec<u32> = (0..8u32).collect();
        let mut dst = vec![0xFFFF_FFFFu32; 12];

        // Destination region is only the first 8 words.
        unsafe { init_data(src.as_ptr(), dst.as_mut_ptr(), dst.as_mut_ptr().add(8)) };

        assert_eq!(&dst[..8], &src[..]);
        assert!(dst[8..].iter().all(|&w| w == 0xFFFF_FFFF));
    }

    #[test]
    fn empty_data_region_copies_nothing() {
        let src = [0xDEAD_BEEFu32];
        let mut dst = [0u32; 1];

        let p = dst.as_mut_ptr();
        unsafe { init_data(src.as_ptr(), p, p) };

        assert_eq!(dst[0], 0);
    }

    #[test]
    fn bss_is_entirely_zero_afterwards() {
        let mut bss = vec![0x5A5A_5A5Au32; 97];

        let range = bss.as_mut_ptr_range();
        unsafe { init_bss(range.start, range.end) };

        assert!(bss.iter().all(|&w| w == 0));
    }

    struct RecordingPlan(Vec<&'static str>);

    impl BootPlan for RecordingPlan {
        fn clocks(&mut self) {
            self.0.push("clocks");
        }
        fn memory(&mut self) {
            self.0.push("memory");
        }
        fn pins(&mut self) {
            self.0.push("pins");
        }
        fn ctors(&mut self) {
            self.0.push("ctors");
        }
    }

    #[test]
    fn bringup_order_is_fixed() {
        let mut plan = RecordingPlan(Vec::new());
        run(&mut plan);
        assert_eq!(plan.0, ["clocks", "memory", "pins", "ctors"]);
    }
}
