// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(not(test), no_std)]
#![cfg_attr(all(target_arch = "arm", target_os = "none"), feature(linkage))]
#![allow(non_snake_case)]

pub mod arm7;
pub use crate::arm7 as arch;
// #[link_section] is only usable from the root crate.
// See https://github.com/rust-lang/rust/issues/67209.
#[cfg(all(target_arch = "arm", target_os = "none"))]
include!("arm7/handlers.rs");
