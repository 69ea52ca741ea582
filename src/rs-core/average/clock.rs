use std::cell::Cell;

/// Source of timestamps, in milliseconds.
///
/// An `ExponentialMovingAverage` only reads it once, when created. Timestamps of recorded
/// samples are then given explicitly by the caller, which should use the same `Clock` (or at
/// least the same time reference) for those.
pub trait Clock {
    /// Returns the current timestamp in milliseconds.
    fn now_ms(&self) -> f64;
}

impl<F: Fn() -> f64> Clock for F {
    fn now_ms(&self) -> f64 {
        self()
    }
}

/// Monotonic `Clock` returning the milliseconds elapsed since it was created.
///
/// Relies on `performance.now()` on the JavaScript side when compiled to WebAssembly, where
/// `std::time::Instant` is not available.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    origin: f64,
}

impl MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {
            origin: crate::bindings::jsNow(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        crate::bindings::jsNow() - self.origin
    }
}

/// `Clock` whose time only changes when told to.
///
/// Mostly useful in tests and simulations, where time has to be deterministic.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, time_ms: f64) {
        self.now.set(time_ms);
    }

    /// Moves the clock forward by `delta_ms` milliseconds and returns the new time.
    pub fn advance(&self, delta_ms: f64) -> f64 {
        let new_time = self.now.get() + delta_ms;
        self.now.set(new_time);
        new_time
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
