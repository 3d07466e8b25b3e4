//! Sending signals to individual threads.
//!
//! Signals are sent using the `__pthread_kill` trap directly, instead of going
//! through `pthread_kill(3)`. This allows signalling any thread in the process
//! using only its kernel-level identifier, without needing its `pthread_t`.
//!
//! The trap itself is implemented per architecture, in modules such as
//! signal/aarch64.rs.
use crate::thread::ThreadId;
use std::ffi::c_int;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
use aarch64::pthread_kill;

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
use x86_64::pthread_kill;

/// Sends `signal` to the thread identified by `thread`.
///
/// This returns `true` if the kernel accepted the signal, and `false`
/// otherwise. The reason for a failure (e.g. the thread no longer exists, or
/// the signal number is invalid) isn't exposed.
///
/// Once this function returns the signal is pending for the target thread, but
/// its handler (if any) may not have run yet.
#[inline]
pub fn send(thread: ThreadId, signal: c_int) -> bool {
    // Safety: the trap only reads its two register arguments, and the kernel
    // validates both of them.
    unsafe { pthread_kill(thread, signal) == 0 }
}

#[no_mangle]
pub extern "system" fn signaler_send_thread_signal(
    thread: ThreadId,
    signal: c_int,
) -> bool {
    send(thread, signal)
}
