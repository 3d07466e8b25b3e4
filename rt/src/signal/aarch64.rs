use crate::abi::SYSCALL_PTHREAD_KILL;
use crate::thread::ThreadId;
use std::arch::asm;
use std::ffi::c_int;

/// Issues the `__pthread_kill` trap, returning the raw status.
///
/// The trap number goes in `x16` and the arguments in `x0` and `x1`. The status
/// is returned in `x0`, and the kernel may overwrite `x1` and `x16`.
#[inline(always)]
pub(super) unsafe fn pthread_kill(thread: ThreadId, signal: c_int) -> u64 {
    let mut status = thread as u64;
    let signal = signal as i64;

    asm!(
        "svc #0x80",
        inlateout("x0") status,
        inlateout("x1") signal => _,
        inlateout("x16") SYSCALL_PTHREAD_KILL => _,
        options(nostack),
    );

    status
}
