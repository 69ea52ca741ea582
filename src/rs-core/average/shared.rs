use std::sync::{Arc, Mutex, MutexGuard};

use super::ExponentialMovingAverage;

/// `ExponentialMovingAverage` which can be recorded into from multiple threads.
///
/// Each `record` call is performed entirely under a lock, so two concurrent producers can not
/// interleave their updates. Cloning it gives another handle to the same average.
#[derive(Clone, Debug)]
pub struct SharedExponentialMovingAverage {
    inner: Arc<Mutex<ExponentialMovingAverage>>,
}

impl SharedExponentialMovingAverage {
    pub fn new(ema: ExponentialMovingAverage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ema)),
        }
    }

    /// Records `value` at time `time_ms` and returns the updated average.
    ///
    /// See `ExponentialMovingAverage::record`.
    pub fn record(&self, time_ms: f64, value: f64) -> f64 {
        self.lock().record(time_ms, value)
    }

    /// Returns the current value of the average.
    pub fn average(&self) -> f64 {
        self.lock().average()
    }

    /// Returns the timestamp, in milliseconds, of the last recorded sample.
    pub fn last_update(&self) -> f64 {
        self.lock().last_update()
    }

    /// Returns a copy of the current state of the average.
    pub fn snapshot(&self) -> ExponentialMovingAverage {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ExponentialMovingAverage> {
        // `record` never panics while holding the lock, the inner state stays consistent.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl From<ExponentialMovingAverage> for SharedExponentialMovingAverage {
    fn from(ema: ExponentialMovingAverage) -> Self {
        Self::new(ema)
    }
}
