//! High-resolution timers: instant, accumulating, and scoped measurement.
//!
//! [`PerformanceCounter`] captures a start and an end tick and reports the
//! elapsed interval in ticks, seconds, milliseconds, or microseconds.
//! [`AccumulatingTimer`] sums many disjoint start/stop intervals into a
//! running total, for cumulative time spent inside a hot path.
//! [`TimerScope`] ties either kind to a lexical scope: started on entry,
//! stopped on every exit path, including unwinding.
//!
//! All three are plain values over [`crate::clock::Ticks`]: no teardown, no
//! internal synchronization. A single timer must not be started/stopped from
//! multiple threads without external locking; that is a caller obligation,
//! not something these types police.
//!
//! ```
//! use syskit::sys::{thread, time::Duration};
//! use syskit::timer::{PerformanceCounter, TimerScope};
//!
//! let mut timer = PerformanceCounter::new();
//! {
//!     let _scope = TimerScope::new(&mut timer);
//!     thread::sleep(Duration::from_millis(20));
//! }
//! assert!(timer.milliseconds() >= 15);
//! ```

use std::marker::PhantomData;

use crate::clock::{Clock, TickClock, Ticks};

/// Anything with start/stop semantics that [`TimerScope`] can drive.
pub trait Timer {
    fn start(&mut self);
    fn stop(&mut self);
}

/// A single-interval timer over a [`TickClock`].
///
/// State machine: idle → started → stopped, re-enterable; `start()` (or
/// [`restart`](Self::restart)) discards any prior measurement and re-arms the
/// base tick. `new()` samples the clock once for both endpoints, so every
/// accessor is well-defined from the moment of construction: a `stop()`
/// without a preceding `start()` measures time since construction.
#[derive(Debug)]
pub struct PerformanceCounter<C: TickClock = Clock> {
    start: Ticks,
    end: Ticks,
    _clock: PhantomData<C>,
}

impl PerformanceCounter {
    /// Creates a timer on the platform [`Clock`] with both endpoints at the
    /// current tick.
    pub fn new() -> Self {
        Self::with_clock()
    }
}

impl<C: TickClock> PerformanceCounter<C> {
    /// Creates a timer on a caller-chosen clock, both endpoints at the
    /// current tick. Useful for driving tests from a scripted clock.
    pub fn with_clock() -> Self {
        let tick = C::now();
        PerformanceCounter {
            start: tick,
            end: tick,
            _clock: PhantomData,
        }
    }

    /// Arms the base tick. Discards any prior measurement.
    pub fn start(&mut self) {
        self.start = C::now();
        self.end = self.start;
    }

    /// Captures the end tick. Idempotent: calling again just re-samples.
    pub fn stop(&mut self) {
        self.end = C::now();
    }

    /// Same as [`start`](Self::start); reads better after a `stop()`.
    pub fn restart(&mut self) {
        self.start();
    }

    /// Elapsed ticks of the measured period. Pure and repeatable.
    pub fn period_count(&self) -> Ticks {
        self.end - self.start
    }

    /// Measured period in fractional seconds.
    pub fn seconds(&self) -> f64 {
        C::delta_to_seconds(self.period_count())
    }

    /// Measured period in whole milliseconds.
    pub fn milliseconds(&self) -> Ticks {
        C::delta_to_milliseconds(self.period_count())
    }

    /// Measured period in whole microseconds.
    pub fn microseconds(&self) -> Ticks {
        C::delta_to_microseconds(self.period_count())
    }

    /// Ticks per second of the underlying clock.
    pub fn frequency() -> Ticks {
        C::frequency()
    }

    /// Stops, reads the period in ticks, and restarts in one call.
    pub fn lap(&mut self) -> Ticks {
        self.stop();
        let period = self.period_count();
        self.restart();
        period
    }

    /// [`lap`](Self::lap), reported in milliseconds.
    pub fn lap_milliseconds(&mut self) -> Ticks {
        C::delta_to_milliseconds(self.lap())
    }

    /// [`lap`](Self::lap), reported in microseconds.
    pub fn lap_microseconds(&mut self) -> Ticks {
        C::delta_to_microseconds(self.lap())
    }
}

impl<C: TickClock> Default for PerformanceCounter<C> {
    fn default() -> Self {
        Self::with_clock()
    }
}

impl<C: TickClock> Clone for PerformanceCounter<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: TickClock> Copy for PerformanceCounter<C> {}

impl<C: TickClock> Timer for PerformanceCounter<C> {
    fn start(&mut self) {
        PerformanceCounter::start(self)
    }

    fn stop(&mut self) {
        PerformanceCounter::stop(self)
    }
}

/// A timer that sums many measured intervals into a running total.
///
/// Each start/stop pair adds the pair's period to the accumulator; after N
/// pairs the total equals the sum of the individual periods, modulo any
/// interleaved [`reset`](Self::reset) or [`decrease`](Self::decrease) calls.
///
/// ```
/// use syskit::sys::{thread, time::Duration};
/// use syskit::timer::AccumulatingTimer;
///
/// let mut total = AccumulatingTimer::new();
/// for _ in 0..2 {
///     total.start();
///     thread::sleep(Duration::from_millis(10));
///     total.stop();
/// }
/// assert!(total.milliseconds() >= 15);
/// total.reset();
/// assert_eq!(total.milliseconds(), 0);
/// ```
#[derive(Debug)]
pub struct AccumulatingTimer<C: TickClock = Clock> {
    timer: PerformanceCounter<C>,
    accumulated: Ticks,
}

impl AccumulatingTimer {
    /// Creates a timer on the platform [`Clock`] with an empty accumulator.
    pub fn new() -> Self {
        Self::with_clock()
    }
}

impl<C: TickClock> AccumulatingTimer<C> {
    /// Creates a timer on a caller-chosen clock with an empty accumulator.
    pub fn with_clock() -> Self {
        AccumulatingTimer {
            timer: PerformanceCounter::with_clock(),
            accumulated: 0,
        }
    }

    /// Begins a new interval.
    pub fn start(&mut self) {
        self.timer.start();
    }

    /// Ends the current interval and adds it to the running total.
    pub fn stop(&mut self) {
        self.timer.stop();
        self.accumulated += self.timer.period_count();
    }

    /// Zeroes the running total. Does not touch an in-flight interval.
    pub fn reset(&mut self) {
        self.accumulated = 0;
    }

    /// Subtracts a known fixed overhead (in ticks) from the total, e.g. the
    /// cost of the measurement calls themselves when profiling very short
    /// operations. Exact arithmetic; over-subtracting drives the total
    /// negative and is the caller's responsibility.
    pub fn decrease(&mut self, overhead: Ticks) {
        self.accumulated -= overhead;
    }

    /// Accumulated ticks across all measured intervals.
    pub fn period_count(&self) -> Ticks {
        self.accumulated
    }

    /// Accumulated time in fractional seconds.
    pub fn seconds(&self) -> f64 {
        C::delta_to_seconds(self.accumulated)
    }

    /// Accumulated time in whole milliseconds.
    pub fn milliseconds(&self) -> Ticks {
        C::delta_to_milliseconds(self.accumulated)
    }

    /// Accumulated time in whole microseconds.
    pub fn microseconds(&self) -> Ticks {
        C::delta_to_microseconds(self.accumulated)
    }

    /// Ticks per second of the underlying clock.
    pub fn frequency() -> Ticks {
        C::frequency()
    }
}

impl<C: TickClock> Default for AccumulatingTimer<C> {
    fn default() -> Self {
        Self::with_clock()
    }
}

impl<C: TickClock> Clone for AccumulatingTimer<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: TickClock> Copy for AccumulatingTimer<C> {}

impl<C: TickClock> Timer for AccumulatingTimer<C> {
    fn start(&mut self) {
        AccumulatingTimer::start(self)
    }

    fn stop(&mut self) {
        AccumulatingTimer::stop(self)
    }
}

/// Starts the referenced timer on construction and stops it on every exit
/// path, whether that is a normal return, an early return, or unwinding.
///
/// [`stop`](Self::stop) ends the measurement early; the drop still issues a
/// final `stop()`, which merely re-samples an instant timer but adds the
/// tail interval to an accumulating one, so prefer ending the scope instead
/// when accumulating.
pub struct TimerScope<'a, T: Timer> {
    timer: &'a mut T,
}

impl<'a, T: Timer> TimerScope<'a, T> {
    /// Starts `timer` and holds it for the lifetime of the scope.
    pub fn new(timer: &'a mut T) -> Self {
        timer.start();
        TimerScope { timer }
    }

    /// Stops the measurement before the scope ends.
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Read-only access to the timer while the scope is open.
    pub fn timer(&self) -> &T {
        self.timer
    }
}

impl<T: Timer> Drop for TimerScope<'_, T> {
    fn drop(&mut self) {
        self.timer.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::thread;
    use crate::sys::time::Duration;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct MockTimer {
        starts: usize,
        stops: usize,
    }

    impl Timer for MockTimer {
        fn start(&mut self) {
            self.starts += 1;
        }
        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    // Ticks are milliseconds; tests drive the clock hand by hand. Each
    // scripted test owns its static so parallel tests don't interleave.
    macro_rules! scripted_clock {
        ($name:ident, $hand:ident) => {
            static $hand: AtomicI64 = AtomicI64::new(0);

            struct $name;

            impl TickClock for $name {
                fn now() -> Ticks {
                    $hand.load(Ordering::Relaxed)
                }
                fn frequency() -> Ticks {
                    1_000
                }
            }
        };
    }

    #[test]
    fn scope_starts_on_entry_and_stops_on_exit() {
        let mut timer = MockTimer::default();
        {
            let scope = TimerScope::new(&mut timer);
            assert_eq!(scope.timer().starts, 1);
            assert_eq!(scope.timer().stops, 0);
        }
        assert_eq!(timer.starts, 1);
        assert_eq!(timer.stops, 1);
    }

    #[test]
    fn scope_early_stop_then_drop_resamples() {
        let mut timer = MockTimer::default();
        {
            let mut scope = TimerScope::new(&mut timer);
            scope.stop();
        }
        assert_eq!(timer.starts, 1);
        assert_eq!(timer.stops, 2);
    }

    #[test]
    fn scope_stops_when_unwinding() {
        let mut timer = MockTimer::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = TimerScope::new(&mut timer);
            panic!("interval interrupted");
        }));
        assert!(result.is_err());
        assert_eq!(timer.starts, 1);
        assert_eq!(timer.stops, 1);
    }

    #[test]
    fn fresh_counter_reads_approximately_zero() {
        let timer: PerformanceCounter = PerformanceCounter::new();
        assert!(timer.microseconds() <= 1);
    }

    #[test]
    fn measures_a_sleep_within_tolerance() {
        let mut timer = PerformanceCounter::new();
        {
            let _scope = TimerScope::new(&mut timer);
            thread::sleep(Duration::from_millis(20));
        }
        let ms = timer.milliseconds();
        // sleep() guarantees at least the requested duration; the upper
        // bound absorbs scheduler jitter on loaded machines.
        assert!(ms >= 15, "measured {ms} ms");
        assert!(ms <= 100, "measured {ms} ms");
    }

    #[test]
    fn restart_discards_the_previous_measurement() {
        let mut timer = PerformanceCounter::new();
        timer.start();
        thread::sleep(Duration::from_millis(5));
        timer.stop();
        let first = timer.microseconds();
        assert!(first > 0);
        timer.restart();
        timer.stop();
        assert!(timer.microseconds() < first);
    }

    #[test]
    fn accumulates_across_real_intervals() {
        let mut total: AccumulatingTimer = AccumulatingTimer::new();
        for _ in 0..2 {
            total.start();
            thread::sleep(Duration::from_millis(10));
            total.stop();
        }
        let ms = total.milliseconds();
        assert!(ms >= 15, "accumulated {ms} ms");
        assert!(ms <= 200, "accumulated {ms} ms");
        total.reset();
        assert_eq!(total.milliseconds(), 0);
    }

    scripted_clock!(AccClock, ACC_HAND);

    #[test]
    fn accumulation_and_decrease_are_exact() {
        ACC_HAND.store(0, Ordering::Relaxed);
        let mut total = AccumulatingTimer::<AccClock>::with_clock();

        total.start();
        ACC_HAND.store(5, Ordering::Relaxed);
        total.stop();

        ACC_HAND.store(10, Ordering::Relaxed);
        total.start();
        ACC_HAND.store(17, Ordering::Relaxed);
        total.stop();

        assert_eq!(total.period_count(), 12);
        assert_eq!(total.milliseconds(), 12);
        assert_eq!(total.microseconds(), 12_000);

        total.decrease(2);
        assert_eq!(total.period_count(), 10);

        total.reset();
        assert_eq!(total.period_count(), 0);
        assert_eq!(total.seconds(), 0.0);
    }

    scripted_clock!(LapClock, LAP_HAND);

    #[test]
    fn lap_reads_and_rearms() {
        LAP_HAND.store(0, Ordering::Relaxed);
        let mut timer = PerformanceCounter::<LapClock>::with_clock();
        timer.start();

        LAP_HAND.store(4, Ordering::Relaxed);
        assert_eq!(timer.lap(), 4);

        LAP_HAND.store(9, Ordering::Relaxed);
        timer.stop();
        assert_eq!(timer.period_count(), 5);
        assert_eq!(timer.milliseconds(), 5);
    }

    scripted_clock!(StopClock, STOP_HAND);

    #[test]
    fn stop_without_start_measures_from_construction() {
        STOP_HAND.store(100, Ordering::Relaxed);
        let mut timer = PerformanceCounter::<StopClock>::with_clock();
        STOP_HAND.store(103, Ordering::Relaxed);
        timer.stop();
        assert_eq!(timer.period_count(), 3);
    }
}
