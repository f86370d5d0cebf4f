// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-at-a-time console for the window before any driver exists.

use core::fmt;

extern "C" {
    fn bl_console_putc(byte: u8);
}

pub struct EarlyConsole;

impl fmt::Write for EarlyConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // SAFETY: write-only board console hook.
            unsafe { bl_console_putc(byte) };
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! early_println {
    ($fmt:expr) => ({
        use core::fmt::Write;
        let mut writer = $crate::console::EarlyConsole {};
        let _ = writer.write_fmt(format_args!(concat!($fmt, "\n")));
    });
    ($fmt:expr, $($arg:tt)*) => ({
        use core::fmt::Write;
        let mut writer = $crate::console::EarlyConsole {};
        let _ = writer.write_fmt(format_args!(concat!($fmt, "\n"), $($arg)*));
    });
}
