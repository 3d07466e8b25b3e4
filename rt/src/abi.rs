//! The private kernel ABI used for sending signals to individual threads.
//!
//! Darwin doesn't offer a public system call for signalling a single thread.
//! `pthread_kill(3)` is implemented in libsystem_pthread on top of the
//! `__pthread_kill` trap, which takes a Mach thread port name and a signal
//! number. The trap number isn't part of any stable interface, so it's pinned
//! here together with the kernel releases it has been verified against.
//!
//! Whenever a new major macOS release comes out, the trap number must be
//! checked against `bsd/kern/syscalls.master` in the matching XNU release and
//! `VERIFIED` extended accordingly.
use rustix::system::uname;
use std::ops::RangeInclusive;

/// The BSD system call number of `__pthread_kill`.
const PTHREAD_KILL: u64 = 328;

/// The index of `__pthread_kill`, as loaded into `x16` before `svc #0x80`.
///
/// On arm64 the system call class is implied by the sign of `x16`: positive
/// values are BSD system calls, negative values are Mach traps.
#[cfg(target_arch = "aarch64")]
pub const SYSCALL_PTHREAD_KILL: u64 = PTHREAD_KILL;

/// The index of `__pthread_kill`, as loaded into `rax` before `syscall`.
///
/// On x86-64 the upper byte selects the system call class, with 2 being the
/// BSD (Unix) class.
#[cfg(target_arch = "x86_64")]
pub const SYSCALL_PTHREAD_KILL: u64 = (2 << 24) | PTHREAD_KILL;

/// The major Darwin releases the trap index is verified against.
///
/// Darwin 19 is macOS 10.15 and Darwin 25 is macOS 26. Apple Silicon support
/// starts at Darwin 20 (macOS 11).
#[cfg(not(target_arch = "aarch64"))]
pub const VERIFIED: RangeInclusive<u32> = 19..=25;

#[cfg(target_arch = "aarch64")]
pub const VERIFIED: RangeInclusive<u32> = 20..=25;

/// A kernel release as reported by `uname -r`, such as "23.4.0".
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct Release {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Release {
    /// Parses a release string.
    ///
    /// Missing minor and patch components default to zero. Anything following
    /// the patch number (e.g. "-generic" on Linux) is ignored.
    pub fn parse(input: &str) -> Option<Release> {
        let mut parts = input.trim().splitn(3, '.');
        let major = parts.next().and_then(leading_number)?;
        let minor = match parts.next() {
            Some(v) => leading_number(v)?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(v) => leading_number(v)?,
            None => 0,
        };

        Some(Release { major, minor, patch })
    }

    /// Returns the release of the running kernel.
    pub fn current() -> Option<Release> {
        let name = uname();

        Release::parse(name.release().to_str().ok()?)
    }

    pub fn is_verified(&self) -> bool {
        VERIFIED.contains(&self.major)
    }
}

fn leading_number(input: &str) -> Option<u32> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());

    input[..end].parse().ok()
}

/// Checks if the running kernel is one the trap index is verified against.
///
/// Sending signals doesn't perform this check itself, as it would add a
/// `uname(2)` call to every signal. Instead, callers should call this once
/// (e.g. when starting up) and decide what to do if it returns `false`.
pub fn check() -> bool {
    let Some(release) = Release::current() else {
        log::warn!("unable to determine the kernel release");
        return false;
    };

    if release.is_verified() {
        log::debug!(
            "kernel release {}.{}.{} is supported",
            release.major,
            release.minor,
            release.patch
        );
        true
    } else {
        log::warn!(
            "kernel release {}.{}.{} isn't in the verified range {}..={}, \
            sending signals to threads may not work",
            release.major,
            release.minor,
            release.patch,
            VERIFIED.start(),
            VERIFIED.end()
        );
        false
    }
}
