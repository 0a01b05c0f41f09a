//! OS-level identifier of the calling thread.
//!
//! Unlike [`std::thread::ThreadId`], the value returned here is the
//! platform's own identifier, suitable for correlating with external tools
//! (debuggers, profilers, log output from other runtimes).

/// OS identifier of the current thread.
///
/// The value is stable for the lifetime of the thread and differs between
/// concurrently live threads. On the web target there is no OS thread
/// identity to report, so this returns 0.
///
/// ```
/// let id = syskit::thread_id::current_thread_id();
/// let other = syskit::sys::thread::spawn(syskit::thread_id::current_thread_id)
///     .join()
///     .unwrap();
/// # #[cfg(not(target_arch = "wasm32"))]
/// assert_ne!(id, other);
/// ```
pub fn current_thread_id() -> usize {
    imp::current_thread_id()
}

#[cfg(all(unix, not(target_arch = "wasm32")))]
mod imp {
    pub fn current_thread_id() -> usize {
        // pthread_t is opaque but unique per live thread, which is all the
        // callers need.
        unsafe { libc::pthread_self() as usize }
    }
}

#[cfg(windows)]
mod imp {
    pub fn current_thread_id() -> usize {
        unsafe { windows_sys::Win32::System::Threading::GetCurrentThreadId() as usize }
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    pub fn current_thread_id() -> usize {
        0
    }
}
