/*!
Small cross-platform system utilities: high-resolution timing, file
discovery, and bounded text formatting.

syskit collects the handful of platform-dependent chores that otherwise get
reimplemented in every project: measuring how long something took, finding
the running executable and files near it, identifying the current thread,
and rendering values into fixed-size byte buffers that can never overflow.

# Overview

The timing subsystem is the core. A [`clock::TickClock`] abstracts a
monotonic tick source with a fixed frequency; [`clock::Clock`] is the
platform implementation (`QueryPerformanceCounter` on Windows,
`gettimeofday` on Unix, `web_time` on WebAssembly). On top of it sit
[`timer::PerformanceCounter`] for one interval, [`timer::AccumulatingTimer`]
for a running total across many intervals, and [`timer::TimerScope`] for
measuring a lexical scope automatically.

Everything works on desktop and WebAssembly. Platform differences are
confined to [`sys`] and to small per-target modules; the public API is
identical everywhere.

# Quick Start

```
use syskit::timer::PerformanceCounter;

let mut timer = PerformanceCounter::new();
timer.start();
let total: u64 = (0..10_000).sum();
timer.stop();
assert!(total > 0);
assert!(timer.seconds() < 60.0);
```

Accumulating across repeated work, with a scope guard driving the
start/stop pairs:

```
use syskit::timer::{AccumulatingTimer, TimerScope};

let mut total = AccumulatingTimer::new();
for _ in 0..3 {
    let _guard = TimerScope::new(&mut total);
    // measured work
}
assert!(total.seconds() >= 0.0);
```

# Feature Flags

- `logwise` - Routes the crate's diagnostic output through the logwise
  logging framework instead of stderr/console

# Module Organization

- [`clock`] - Tick sources and tick-to-time conversion
- [`timer`] - Instant, accumulating, and scoped timers
- [`files`] - Executable paths and file search
- [`strings`] - Bounded string copies and hex dumps
- [`format`] - Type-erased value formatting
- [`thread_id`] - OS thread identifiers
- [`once_nonlock`] - Non-blocking one-time initialization
- [`sys`] - Per-platform aliases for time and threading
*/
pub mod clock;
pub mod files;
pub mod format;
mod logging;
pub mod once_nonlock;
pub mod strings;
pub mod sys;
pub mod thread_id;
pub mod timer;
