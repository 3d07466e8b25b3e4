use crate::abi::SYSCALL_PTHREAD_KILL;
use crate::thread::ThreadId;
use std::arch::asm;
use std::ffi::c_int;

/// Issues the `__pthread_kill` trap, returning the raw status.
///
/// The trap number goes in `rax` and the arguments in `rdi` and `rsi`. The
/// status is returned in `rax`, and `syscall` itself clobbers `rcx` and `r11`.
#[inline(always)]
pub(super) unsafe fn pthread_kill(thread: ThreadId, signal: c_int) -> u64 {
    let thread = thread as u64;
    let signal = signal as i64;
    let status: u64;

    asm!(
        "syscall",
        inlateout("rax") SYSCALL_PTHREAD_KILL => status,
        in("rdi") thread,
        in("rsi") signal,
        lateout("rcx") _,
        lateout("r11") _,
        options(nostack),
    );

    status
}
