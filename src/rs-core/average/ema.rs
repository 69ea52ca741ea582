use std::f64::consts::LN_2;

use super::{clock::Clock, configuration::EmaConfiguration, EmaError};
use crate::Logger;

/// Exponential moving average over timestamped samples.
///
/// Each sample is blended into the current average with a weight depending on the time
/// elapsed since the previous accepted sample: the weight of what was already averaged
/// drops to one half once `half_life` milliseconds went by.
///
/// This is useful to smooth noisy readings (sensor values, request durations...) which
/// arrive at irregular intervals.
///
/// Timestamps are expected to be non-decreasing. This is not enforced: a timestamp going
/// back in time leads to a blending weight superior to `1`, which may push the average
/// outside the range of the values recorded until now.
///
/// Updating needs exclusive access. Use a
/// [`SharedExponentialMovingAverage`](super::SharedExponentialMovingAverage) when several
/// producers record into the same average.
#[derive(Clone, Debug)]
pub struct ExponentialMovingAverage {
    /// `half_life / ln(2)`, in milliseconds.
    decay_factor: f64,
    /// Current smoothed value.
    average: f64,
    /// Timestamp, in milliseconds, of the last accepted sample (or of creation).
    last_update: f64,
}

impl ExponentialMovingAverage {
    /// Creates a new `ExponentialMovingAverage` whose average starts at `initial_value`.
    ///
    /// `clock` is read once, to know from when the first recorded sample should be weighted.
    ///
    /// # Arguments
    ///
    /// * `half_life` - Time in milliseconds after which the weight of a value drops to 1/2.
    ///   Has to be a finite, strictly positive number.
    ///
    /// * `initial_value` - Value of the average before any sample is recorded.
    pub fn new<C: Clock + ?Sized>(
        half_life: f64,
        initial_value: f64,
        clock: &C,
    ) -> Result<Self, EmaError> {
        Self::starting_at(half_life, initial_value, clock.now_ms())
    }

    /// Same as `new`, but with an explicit starting timestamp in milliseconds instead of a
    /// `Clock`.
    pub fn starting_at(
        half_life: f64,
        initial_value: f64,
        start_ms: f64,
    ) -> Result<Self, EmaError> {
        if !half_life.is_finite() || half_life <= 0. {
            return Err(EmaError::InvalidHalfLife(half_life));
        }
        if !initial_value.is_finite() {
            return Err(EmaError::InvalidInitialValue(initial_value));
        }
        if !start_ms.is_finite() {
            return Err(EmaError::InvalidTimestamp(start_ms));
        }
        Ok(Self {
            decay_factor: half_life / LN_2,
            average: initial_value,
            last_update: start_ms,
        })
    }

    /// Creates a new `ExponentialMovingAverage` from an `EmaConfiguration`.
    pub fn from_configuration<C: Clock + ?Sized>(
        config: &EmaConfiguration,
        clock: &C,
    ) -> Result<Self, EmaError> {
        Self::new(config.half_life_ms, config.initial_value, clock)
    }

    /// Records `value` at time `time_ms` and returns the updated average.
    ///
    /// NaN and infinite values or timestamps are ignored: the state is left untouched and the
    /// current average is returned.
    pub fn record(&mut self, time_ms: f64, value: f64) -> f64 {
        if !value.is_finite() {
            Logger::lazy_debug(&|| format!("EMA: ignoring non-finite sample {value}"));
            return self.average;
        }
        if !time_ms.is_finite() {
            Logger::lazy_debug(&|| format!("EMA: ignoring sample at non-finite time {time_ms}"));
            return self.average;
        }

        let elapsed = time_ms - self.last_update;
        if elapsed < 0. {
            Logger::lazy_warn(&|| {
                format!(
                    "EMA: sample at {time_ms}ms is older than the last one ({}ms)",
                    self.last_update
                )
            });
        }

        let alpha = f64::exp(-elapsed / self.decay_factor);
        let new_average = alpha * self.average + (1. - alpha) * value;
        if !new_average.is_finite() {
            // Only reachable when going far enough back in time for `alpha` to overflow.
            Logger::lazy_warn(&|| {
                format!("EMA: discarding sample at {time_ms}ms, blend is not finite")
            });
            return self.average;
        }

        self.average = new_average;
        self.last_update = time_ms;
        self.average
    }

    /// Returns the current value of the average.
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Returns the timestamp, in milliseconds, of the last recorded sample.
    ///
    /// Before any sample was recorded, this is the time at which this
    /// `ExponentialMovingAverage` was created.
    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    pub fn decay_factor(&self) -> f64 {
        self.decay_factor
    }

    /// Returns the half-life this `ExponentialMovingAverage` was created with, in milliseconds.
    pub fn half_life(&self) -> f64 {
        self.decay_factor * LN_2
    }
}

/// Average built from `EmaConfiguration::default()`, starting at timestamp `0`.
impl Default for ExponentialMovingAverage {
    fn default() -> Self {
        let config = EmaConfiguration::default();
        Self {
            decay_factor: config.half_life_ms / LN_2,
            average: config.initial_value,
            last_update: 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::average::ManualClock;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_initial_value() {
        let ema = ExponentialMovingAverage::starting_at(1000., 42.5, 0.).unwrap();
        assert_eq!(ema.average(), 42.5);
        assert_eq!(ema.last_update(), 0.);
        assert_close(ema.half_life(), 1000.);
        assert_close(ema.decay_factor(), 1000. / LN_2);
    }

    #[test]
    fn test_default() {
        let ema = ExponentialMovingAverage::default();
        let config = EmaConfiguration::default();
        assert_eq!(ema.average(), config.initial_value);
        assert_eq!(ema.last_update(), 0.);
        assert_close(ema.half_life(), config.half_life_ms);
    }

    #[test]
    fn test_clock_seeds_last_update() {
        let clock = ManualClock::new(1234.);
        let ema = ExponentialMovingAverage::new(500., 1., &clock).unwrap();
        assert_eq!(ema.last_update(), 1234.);

        let ema = ExponentialMovingAverage::new(500., 1., &|| 77.).unwrap();
        assert_eq!(ema.last_update(), 77.);
    }

    #[test]
    fn test_from_configuration() {
        let clock = ManualClock::new(10.);
        let config = EmaConfiguration {
            half_life_ms: 250.,
            initial_value: 3.,
        };
        let ema = ExponentialMovingAverage::from_configuration(&config, &clock).unwrap();
        assert_eq!(ema.average(), 3.);
        assert_eq!(ema.last_update(), 10.);
        assert_close(ema.half_life(), 250.);
    }

    #[test]
    fn test_invalid_construction() {
        for half_life in [0., -1., f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ExponentialMovingAverage::starting_at(half_life, 0., 0.),
                Err(EmaError::InvalidHalfLife(_))
            ));
        }
        for init in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ExponentialMovingAverage::starting_at(1000., init, 0.),
                Err(EmaError::InvalidInitialValue(_))
            ));
        }
        assert!(matches!(
            ExponentialMovingAverage::starting_at(1000., 0., f64::NAN),
            Err(EmaError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_non_finite_samples_are_ignored() {
        let mut ema = ExponentialMovingAverage::starting_at(1000., 5., 0.).unwrap();
        ema.record(100., 8.);
        let average = ema.average();
        let last_update = ema.last_update();
        for _ in 0..3 {
            assert_eq!(ema.record(2000., f64::NAN), average);
            assert_eq!(ema.record(3000., f64::INFINITY), average);
            assert_eq!(ema.record(4000., f64::NEG_INFINITY), average);
        }
        assert_eq!(ema.average(), average);
        assert_eq!(ema.last_update(), last_update);
    }

    #[test]
    fn test_non_finite_timestamps_are_ignored() {
        let mut ema = ExponentialMovingAverage::starting_at(1000., 0., 0.).unwrap();
        for time in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(ema.record(time, 10.), 0.);
            assert_eq!(ema.average(), 0.);
            assert_eq!(ema.last_update(), 0.);
        }

        // Later samples are still blended normally.
        assert_close(ema.record(1000., 20.), 10.);
        assert_close(ema.record(2000., 20.), 15.);
        assert_eq!(ema.last_update(), 2000.);
    }

    #[test]
    fn test_zero_elapsed_time() {
        let mut ema = ExponentialMovingAverage::starting_at(1000., 3., 500.).unwrap();
        assert_close(ema.record(500., 100.), 3.);
        assert_eq!(ema.last_update(), 500.);

        ema.record(1500., 10.);
        let average = ema.average();
        assert_close(ema.record(1500., -50.), average);
        assert_eq!(ema.last_update(), 1500.);
    }

    #[test]
    fn test_half_life() {
        let half_life = 750.;
        let mut ema = ExponentialMovingAverage::starting_at(half_life, 2., 0.).unwrap();
        ema.record(0., 6.);
        assert_close(ema.record(half_life, 6.), 2. * 0.5 + 6. * 0.5);

        // Two half-lives: a quarter of the previous average is kept.
        let mut ema = ExponentialMovingAverage::starting_at(half_life, 8., 0.).unwrap();
        assert_close(ema.record(2. * half_life, 0.), 2.);
    }

    #[test]
    fn test_end_to_end() {
        let mut ema = ExponentialMovingAverage::starting_at(1000., 0., 0.).unwrap();
        assert_close(ema.record(1000., 10.), 5.);
        assert_close(ema.record(2000., 10.), 7.5);
        assert_close(ema.average(), 7.5);
        assert_eq!(ema.last_update(), 2000.);
    }

    #[test]
    fn test_convergence() {
        for init in [-1000., 0., 1e6] {
            let mut ema = ExponentialMovingAverage::starting_at(1000., init, 0.).unwrap();
            let mut prev_distance = (init - 12.).abs();
            for i in 1..=100 {
                let avg = ema.record(f64::from(i) * 250., 12.);
                let distance = (avg - 12.).abs();
                assert!(distance <= prev_distance);
                prev_distance = distance;
            }
            assert!(prev_distance < 1e-6 * (1. + init.abs()));
        }
    }

    #[test]
    fn test_bounded_for_ordered_samples() {
        let (lo, hi) = (-3., 7.);
        let mut ema = ExponentialMovingAverage::starting_at(400., 0., 0.).unwrap();
        let mut time = 0.;
        let mut value = lo;
        for i in 0..500u32 {
            // Irregular, non-decreasing intervals and values spread over [lo, hi].
            time += f64::from(i % 7) * 37.5;
            value = if value + 3.3 > hi { lo + (value + 3.3 - hi) } else { value + 3.3 };
            let avg = ema.record(time, value);
            assert!(avg >= lo - EPSILON && avg <= hi + EPSILON);
        }
    }

    #[test]
    fn test_backwards_timestamp() {
        let mut ema = ExponentialMovingAverage::starting_at(1000., 0., 0.).unwrap();
        ema.record(1000., 10.);
        // alpha = 2 when going back one half-life: 2 * 5 - 1 * 10 = 0
        assert_close(ema.record(0., 10.), 0.);
        assert_eq!(ema.last_update(), 0.);

        // Overshoot outside of the recorded range.
        assert_close(ema.record(-1000., 10.), -10.);
    }

    #[test]
    fn test_overflowing_blend_is_ignored() {
        let mut ema = ExponentialMovingAverage::starting_at(1., 1., 0.).unwrap();
        assert_eq!(ema.record(-1e9, 2.), 1.);
        assert_eq!(ema.last_update(), 0.);
        assert!(ema.average().is_finite());
    }
}
