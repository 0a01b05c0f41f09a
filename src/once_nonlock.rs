/*!
A non-blocking synchronization primitive for one-time initialization.

`OnceNonLock<T>` initializes a value exactly once, like `std::sync::OnceLock`,
with one crucial difference: it never blocks waiting threads. While one thread
is initializing the value, other threads receive `None` and can fall back to
computing the value themselves.

This crate uses it for process-wide cached clock state (tick frequency, the
chosen measure function, the wasm time origin): the first caller pays for the
OS query, later callers read the cached value, and a caller that loses the
initialization race simply re-queries instead of parking.

# Internal states

Initialization is coordinated through three atomic states:
- `INITIAL` (0): not initialized
- `IN_PROGRESS` (1): a thread is initializing
- `DONE` (2): initialized, value readable
*/
use std::cell::UnsafeCell;
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicU8, Ordering};

const ONCE_INITIAL: u8 = 0;
const ONCE_IN_PROGRESS: u8 = 1;
const ONCE_DONE: u8 = 2;

pub struct OnceNonLock<T> {
    once: AtomicU8,
    value: UnsafeCell<ManuallyDrop<Option<T>>>,
}

impl<T> OnceNonLock<T> {
    /// Creates a new, uninitialized cell.
    ///
    /// `const` so the cell can back a `static`.
    pub const fn new() -> Self {
        OnceNonLock {
            once: AtomicU8::new(ONCE_INITIAL),
            value: UnsafeCell::new(ManuallyDrop::new(None)),
        }
    }

    /// Returns the value, initializing it with `f` if necessary.
    ///
    /// Follows try-semantics throughout:
    /// - if this thread wins the initialization race, `f` runs and its result
    ///   is stored and returned; `f` returning `None` resets the cell to the
    ///   uninitialized state so a later caller can retry
    /// - if another thread is mid-initialization, returns `None` immediately
    ///   rather than blocking
    /// - if the value is already initialized, returns it
    pub fn try_get_or_init<F>(&self, f: F) -> Option<&T>
    where
        F: FnOnce() -> Option<T>,
    {
        match self.once.compare_exchange(
            ONCE_INITIAL,
            ONCE_IN_PROGRESS,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                let value = f();
                unsafe {
                    // SAFETY: we hold the IN_PROGRESS state, so no other
                    // thread reads or writes the slot.
                    if let Some(value) = value {
                        *self.value.get() = ManuallyDrop::new(Some(value));
                        self.once.store(ONCE_DONE, Ordering::Release);
                    } else {
                        self.once.store(ONCE_INITIAL, Ordering::Release);
                    }
                }
                unsafe {
                    // SAFETY: either DONE (value present) or back to INITIAL
                    // (slot holds None); both are safe to read here.
                    (*self.value.get()).as_ref()
                }
            }
            Err(ONCE_IN_PROGRESS) => None,
            Err(ONCE_DONE) => unsafe {
                // SAFETY: DONE is terminal, the value is immutable from here.
                (*self.value.get()).as_ref()
            },
            Err(other) => panic!("OnceNonLock: invalid state {other} on init"),
        }
    }

    /// Returns the initialized value, if any. Never blocks, never initializes.
    pub fn get(&self) -> Option<&T> {
        match self.once.load(Ordering::Acquire) {
            ONCE_INITIAL | ONCE_IN_PROGRESS => None,
            ONCE_DONE => unsafe {
                // SAFETY: DONE is terminal, the value is immutable from here.
                (*self.value.get()).as_ref()
            },
            other => panic!("OnceNonLock: invalid state {other} on get"),
        }
    }
}

impl<T> Drop for OnceNonLock<T> {
    fn drop(&mut self) {
        match self.once.load(Ordering::Relaxed) {
            ONCE_INITIAL => {}
            ONCE_IN_PROGRESS => {
                panic!("OnceNonLock: dropped while initialization in progress")
            }
            ONCE_DONE => unsafe {
                // SAFETY: exclusive access in drop; the value was stored.
                ManuallyDrop::drop(&mut *self.value.get());
            },
            other => panic!("OnceNonLock: invalid state {other} on drop"),
        }
    }
}

// SAFETY: the atomic state machine ensures exactly one writer (the thread
// that won the CAS) and that readers only observe the slot after a Release
// store of DONE, so sending/sharing follows T's own capabilities.
unsafe impl<T: Send> Send for OnceNonLock<T> {}
unsafe impl<T: Sync> Sync for OnceNonLock<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn initializes_exactly_once() {
        static CELL: OnceNonLock<u32> = OnceNonLock::new();
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let init = || {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Some(7)
        };
        assert_eq!(CELL.try_get_or_init(init), Some(&7));
        assert_eq!(CELL.try_get_or_init(init), Some(&7));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(CELL.get(), Some(&7));
    }

    #[test]
    fn failed_init_allows_retry() {
        let cell: OnceNonLock<u32> = OnceNonLock::new();
        assert_eq!(cell.try_get_or_init(|| None), None);
        assert_eq!(cell.get(), None);
        assert_eq!(cell.try_get_or_init(|| Some(3)), Some(&3));
    }

    #[test]
    fn concurrent_initializers_agree() {
        static CELL: OnceNonLock<usize> = OnceNonLock::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    // Losing the race yields None; winners and late arrivals
                    // must all observe the same stored value.
                    CELL.try_get_or_init(|| Some(i)).copied()
                })
            })
            .collect();
        let seen: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert!(!seen.is_empty());
        let first = seen[0];
        assert!(seen.iter().all(|&v| v == first));
    }
}
