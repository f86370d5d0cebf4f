// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal `log` backend for the early boot window.

use crate::early_println;
use log::{LevelFilter, Metadata, Record};

struct Logger;

/// Install the early logger. Call once, after the console clocks are
/// live.
pub fn init() {
    static LOGGER: Logger = Logger;
    #[cfg(debug_assertions)]
    log::set_max_level(LevelFilter::Trace);
    #[cfg(not(debug_assertions))]
    log::set_max_level(LevelFilter::Warn);
    let _ = log::set_logger(&LOGGER);
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        early_println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}
