//! Clock source: platform tick reader with a cached frequency and
//! overflow-safe unit conversions.
//!
//! A [`Ticks`] value is an opaque timestamp sample; it only acquires meaning
//! when two samples are subtracted. [`TickClock`] is the uniform contract
//! (`now()`, `frequency()`, and delta conversions) and [`Clock`] is the one
//! concrete implementation compiled for the current target:
//!
//! - **windows**: `QueryPerformanceCounter`, with a transparent fallback to
//!   `GetTickCount` (frequency 1000) when the machine reports no performance
//!   counter. Both the frequency and the chosen measure function are queried
//!   once and cached for the process lifetime.
//! - **unix**: `gettimeofday` microseconds. This is a wall clock; callers
//!   must tolerate the rare non-monotonic delta after a clock adjustment.
//! - **wasm32**: microseconds of [`crate::sys::time::Instant`] elapsed since
//!   a cached process origin.
//!
//! There is no failure path: clock-source unavailability is a silent
//! fallback, never an error.

/// An opaque timestamp sample, meaningful only under subtraction.
pub type Ticks = i64;

const MILLIS_PER_SEC: Ticks = 1_000;
const MICROS_PER_SEC: Ticks = 1_000_000;

/// The clock-source contract: comparable tick samples plus conversions from
/// tick deltas to wall units.
///
/// The integer conversions multiply before dividing while the product cannot
/// overflow `i64`, which keeps sub-second through multi-hour deltas exact;
/// past the threshold they divide first and accept the reduced precision.
pub trait TickClock {
    /// Reads the platform clock. Infallible.
    fn now() -> Ticks;

    /// Ticks per second of the active source. Constant for the process
    /// lifetime.
    fn frequency() -> Ticks;

    /// Converts a tick delta to fractional seconds.
    fn delta_to_seconds(delta: Ticks) -> f64 {
        delta as f64 / Self::frequency() as f64
    }

    /// Converts a tick delta to whole milliseconds.
    fn delta_to_milliseconds(delta: Ticks) -> Ticks {
        if delta < Ticks::MAX / MILLIS_PER_SEC {
            delta * MILLIS_PER_SEC / Self::frequency()
        } else {
            delta / Self::frequency() * MILLIS_PER_SEC
        }
    }

    /// Converts a tick delta to whole microseconds.
    fn delta_to_microseconds(delta: Ticks) -> Ticks {
        if delta < Ticks::MAX / MICROS_PER_SEC {
            delta * MICROS_PER_SEC / Self::frequency()
        } else {
            delta / Self::frequency() * MICROS_PER_SEC
        }
    }
}

/// The platform clock for the current target.
///
/// ```
/// use syskit::clock::{Clock, TickClock};
///
/// let a = Clock::now();
/// let b = Clock::now();
/// assert!(Clock::frequency() > 0);
/// assert!(b - a >= 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Clock;

impl TickClock for Clock {
    fn now() -> Ticks {
        imp::now()
    }

    fn frequency() -> Ticks {
        imp::frequency()
    }
}

#[cfg(windows)]
mod imp {
    use super::Ticks;
    use crate::once_nonlock::OnceNonLock;
    use windows_sys::Win32::System::Performance::{
        QueryPerformanceCounter, QueryPerformanceFrequency,
    };
    use windows_sys::Win32::System::SystemInformation::GetTickCount;

    type MeasureFn = fn() -> Ticks;

    static FREQUENCY: OnceNonLock<Ticks> = OnceNonLock::new();
    static MEASURE: OnceNonLock<MeasureFn> = OnceNonLock::new();

    fn query_frequency() -> Ticks {
        let mut frequency = 0;
        // SAFETY: valid out-pointer.
        let ok = unsafe { QueryPerformanceFrequency(&mut frequency) };
        if ok == 0 || frequency == 0 {
            // No performance counter in the system; GetTickCount ticks in
            // milliseconds, so report 1000 and the conversion math holds.
            1000
        } else {
            frequency
        }
    }

    fn qpc() -> Ticks {
        let mut value = 0;
        // SAFETY: valid out-pointer.
        unsafe { QueryPerformanceCounter(&mut value) };
        value
    }

    fn gtc() -> Ticks {
        // SAFETY: no arguments, no preconditions.
        unsafe { GetTickCount() as Ticks }
    }

    fn pick_measure_fn() -> MeasureFn {
        let mut frequency = 0;
        // SAFETY: valid out-pointer.
        if unsafe { QueryPerformanceFrequency(&mut frequency) } != 0 {
            qpc
        } else {
            gtc
        }
    }

    pub fn now() -> Ticks {
        // A reader that loses the init race measures directly this once.
        let measure = MEASURE
            .try_get_or_init(|| Some(pick_measure_fn()))
            .copied()
            .unwrap_or_else(pick_measure_fn);
        measure()
    }

    pub fn frequency() -> Ticks {
        FREQUENCY
            .try_get_or_init(|| Some(query_frequency()))
            .copied()
            .unwrap_or_else(query_frequency)
    }
}

#[cfg(all(unix, not(target_arch = "wasm32")))]
mod imp {
    use super::{MICROS_PER_SEC, Ticks};

    pub fn now() -> Ticks {
        let mut tv = libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: valid out-pointer; a null timezone is specified behavior.
        unsafe { libc::gettimeofday(&mut tv, std::ptr::null_mut()) };
        tv.tv_sec as Ticks * MICROS_PER_SEC + tv.tv_usec as Ticks
    }

    pub fn frequency() -> Ticks {
        MICROS_PER_SEC
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::{MICROS_PER_SEC, Ticks};
    use crate::once_nonlock::OnceNonLock;
    use crate::sys::time::Instant;

    static ORIGIN: OnceNonLock<Instant> = OnceNonLock::new();

    pub fn now() -> Ticks {
        // A caller racing the origin initialization observes the zero tick;
        // in practice the browser main thread is the first caller.
        ORIGIN
            .try_get_or_init(|| Some(Instant::now()))
            .map(|origin| origin.elapsed().as_micros() as Ticks)
            .unwrap_or(0)
    }

    pub fn frequency() -> Ticks {
        MICROS_PER_SEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MegahertzClock;

    impl TickClock for MegahertzClock {
        fn now() -> Ticks {
            0
        }
        fn frequency() -> Ticks {
            1_000_000
        }
    }

    #[test]
    fn frequency_is_positive_and_stable() {
        let first = Clock::frequency();
        assert!(first > 0);
        assert_eq!(first, Clock::frequency());
    }

    #[test]
    fn now_does_not_run_backwards_in_practice() {
        let a = Clock::now();
        let b = Clock::now();
        assert!(b >= a);
    }

    #[test]
    fn small_deltas_convert_exactly() {
        assert_eq!(MegahertzClock::delta_to_microseconds(1_234_567), 1_234_567);
        assert_eq!(MegahertzClock::delta_to_milliseconds(1_234_567), 1_234);
        assert!((MegahertzClock::delta_to_seconds(1_500_000) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn huge_deltas_take_the_divide_first_path() {
        let delta = Ticks::MAX / MILLIS_PER_SEC + 5;
        let expected = delta / MegahertzClock::frequency() * MILLIS_PER_SEC;
        assert_eq!(MegahertzClock::delta_to_milliseconds(delta), expected);

        let delta = Ticks::MAX / MICROS_PER_SEC + 5;
        let expected = delta / MegahertzClock::frequency() * MICROS_PER_SEC;
        assert_eq!(MegahertzClock::delta_to_microseconds(delta), expected);
    }

    #[test]
    fn zero_delta_is_zero_everywhere() {
        assert_eq!(MegahertzClock::delta_to_milliseconds(0), 0);
        assert_eq!(MegahertzClock::delta_to_microseconds(0), 0);
        assert_eq!(MegahertzClock::delta_to_seconds(0), 0.0);
    }
}
