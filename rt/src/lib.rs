//! Sending signals to individual threads of the current process.
//!
//! Signals are sent using the kernel's private thread signal trap, which is
//! only supported on macOS running on arm64 or x86-64. On other targets only
//! the `abi` module is available.

pub mod abi;

#[cfg(all(
    target_os = "macos",
    any(target_arch = "aarch64", target_arch = "x86_64")
))]
mod signal;

#[cfg(all(
    target_os = "macos",
    any(target_arch = "aarch64", target_arch = "x86_64")
))]
pub mod thread;

#[cfg(all(
    target_os = "macos",
    any(target_arch = "aarch64", target_arch = "x86_64")
))]
pub use crate::{
    signal::{send, signaler_send_thread_signal},
    thread::ThreadId,
};

#[cfg(all(
    test,
    target_os = "macos",
    any(target_arch = "aarch64", target_arch = "x86_64")
))]
