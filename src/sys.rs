//! Platform abstraction layer for system APIs.
//!
//! Re-exports platform-appropriate implementations of common system APIs so
//! the rest of the crate (and downstream code) can use them without
//! target-specific conditionals.
//!
//! - **Time**: `std::time` on native targets, [`web_time`] on WebAssembly
//!   (browser-compatible `Instant`/`Duration` backed by `performance.now()`).
//! - **Threading**: `std::thread` on native targets, [`wasm_thread`] on
//!   WebAssembly (Web Workers).
//!
//! Always import these APIs through this module rather than directly from
//! std or the platform crates; that keeps call sites portable.
//!
//! ```
//! use syskit::sys::{thread, time};
//!
//! let start = time::Instant::now();
//! thread::sleep(time::Duration::from_millis(1));
//! assert!(start.elapsed() >= time::Duration::from_millis(1));
//! ```

/// Platform-appropriate time API.
///
/// `Duration` and `Instant` are available on every target; `SystemTime` is
/// native-only. Browser time may have reduced resolution due to spectre-class
/// mitigations, which is one reason [`crate::clock`] reports an explicit tick
/// frequency instead of promising a resolution.
#[cfg(not(target_arch = "wasm32"))]
pub use std::time;
#[cfg(target_arch = "wasm32")]
pub use web_time as time;

/// Platform-appropriate threading API.
///
/// `spawn`, `sleep`, `current`, and `JoinHandle` work on every target. On
/// WebAssembly threads are Web Workers, with the usual browser limitations
/// (shared memory needs cross-origin isolation, thread counts may be capped).
#[cfg(not(target_arch = "wasm32"))]
pub use std::thread;
#[cfg(target_arch = "wasm32")]
pub use wasm_thread as thread;
