//! Kernel-level identifiers and state of the threads in the current process.
//!
//! mach2 doesn't cover `thread_info()` or its flavors, so those come from libc.
use libc::{
    integer_t, thread_basic_info, THREAD_BASIC_INFO, THREAD_BASIC_INFO_COUNT,
    TH_STATE_HALTED, TH_STATE_RUNNING, TH_STATE_STOPPED,
    TH_STATE_UNINTERRUPTIBLE, TH_STATE_WAITING,
};
use mach2::kern_return::{kern_return_t, KERN_SUCCESS};
use mach2::mach_init::mach_thread_self;
use mach2::mach_port::mach_port_deallocate;
use mach2::mach_types::thread_act_array_t;
use mach2::message::mach_msg_type_number_t;
use mach2::task::task_threads;
use mach2::traps::mach_task_self;
use mach2::vm::mach_vm_deallocate;
use mach2::vm_types::{mach_vm_address_t, mach_vm_size_t};
use std::mem::{size_of, MaybeUninit};
use std::ptr::null_mut;
use std::slice;

/// The kernel-level identifier of a thread.
///
/// This is the name of the Mach port representing the thread in the current
/// task, not a `pthread_t`.
pub type ThreadId = u32;

/// The run state of a thread, as reported by the kernel.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ThreadState {
    Running,
    Stopped,
    Waiting,
    Uninterruptible,
    Halted,

    /// The kernel reported a run state this type doesn't know about.
    Unknown(integer_t),

    /// The thread doesn't exist, or its state couldn't be retrieved.
    Invalid,
}

impl ThreadState {
    fn from_raw(value: integer_t) -> ThreadState {
        match value {
            TH_STATE_RUNNING => ThreadState::Running,
            TH_STATE_STOPPED => ThreadState::Stopped,
            TH_STATE_WAITING => ThreadState::Waiting,
            TH_STATE_UNINTERRUPTIBLE => ThreadState::Uninterruptible,
            TH_STATE_HALTED => ThreadState::Halted,
            other => ThreadState::Unknown(other),
        }
    }
}

/// Drops the extra send right that comes with a thread port handed out by the
/// kernel.
///
/// The thread itself keeps its port name alive, so the name remains usable
/// for as long as the thread runs.
fn release(thread: ThreadId) {
    let res: kern_return_t =
        unsafe { mach_port_deallocate(mach_task_self(), thread) };

    if res != KERN_SUCCESS {
        log::debug!(
            "mach_port_deallocate() for thread {} failed: {}",
            thread,
            res
        );
    }
}

/// Returns the kernel-level identifier of the calling thread.
///
/// `mach_thread_self()` hands out a new send right on every call, which we
/// drop right away instead of leaking one per call.
pub fn current() -> ThreadId {
    let port = unsafe { mach_thread_self() };

    release(port);
    port
}

/// Returns the kernel-level identifiers of all threads in the current process.
///
/// Threads may start or stop at any time, so the list is only a snapshot. If
/// the threads can't be retrieved an empty list is returned.
pub fn list() -> Vec<ThreadId> {
    let task = unsafe { mach_task_self() };
    let mut threads: thread_act_array_t = null_mut();
    let mut count: mach_msg_type_number_t = 0;
    let res = unsafe { task_threads(task, &mut threads, &mut count) };

    if res != KERN_SUCCESS {
        log::debug!("task_threads() failed: {}", res);
        return Vec::new();
    }

    if threads.is_null() || count == 0 {
        return Vec::new();
    }

    let ids =
        unsafe { slice::from_raw_parts(threads, count as usize) }.to_vec();

    for &id in &ids {
        release(id);
    }

    let size = (count as usize * size_of::<ThreadId>()) as mach_vm_size_t;
    let res = unsafe {
        mach_vm_deallocate(task, threads as mach_vm_address_t, size)
    };

    if res != KERN_SUCCESS {
        log::debug!("mach_vm_deallocate() of the thread list failed: {}", res);
    }

    ids
}

/// Returns the run state of the given thread.
pub fn state(thread: ThreadId) -> ThreadState {
    let mut info = MaybeUninit::<thread_basic_info>::uninit();
    let mut count = THREAD_BASIC_INFO_COUNT;
    let res = unsafe {
        libc::thread_info(
            thread,
            THREAD_BASIC_INFO as _,
            info.as_mut_ptr() as _,
            &mut count as *mut _,
        )
    };

    if res != KERN_SUCCESS {
        log::debug!("thread_info() for thread {} failed: {}", thread, res);
        return ThreadState::Invalid;
    }

    ThreadState::from_raw(unsafe { info.assume_init() }.run_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::send;
    use crate::test::{expect_delivery, Target, SIGNAL};

    #[test]
    fn test_current() {
        let id = current();

        assert_ne!(id, 0);
        assert_eq!(current(), id);
    }

    #[test]
    fn test_current_differs_per_thread() {
        let target = Target::spawn();

        assert_ne!(target.id, current());
    }

    #[test]
    fn test_state_current_thread() {
        assert_eq!(state(current()), ThreadState::Running);
    }

    #[test]
    fn test_state_other_thread() {
        let target = Target::spawn();

        assert_ne!(state(target.id), ThreadState::Invalid);
    }

    #[test]
    fn test_state_invalid_thread() {
        assert_eq!(state(0), ThreadState::Invalid);
        assert_eq!(state(u32::MAX), ThreadState::Invalid);
    }

    #[test]
    fn test_state_from_raw() {
        assert_eq!(
            ThreadState::from_raw(TH_STATE_WAITING),
            ThreadState::Waiting
        );
        assert_eq!(ThreadState::from_raw(42), ThreadState::Unknown(42));
    }

    #[test]
    fn test_list() {
        let target = Target::spawn();
        let threads = list();

        assert!(threads.contains(&current()));
        assert!(threads.contains(&target.id));
    }

    #[test]
    fn test_list_ids_stay_usable() {
        let target = Target::spawn();

        assert!(list().contains(&target.id));
        assert!(list().contains(&target.id));

        // Listing releases the extra port references it receives, which must
        // not invalidate the names held by the threads themselves.
        assert_ne!(state(target.id), ThreadState::Invalid);
        assert!(send(target.id, SIGNAL));
        expect_delivery(&target, 1);
    }
}
