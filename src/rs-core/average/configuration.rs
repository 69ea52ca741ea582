const DEFAULT_HALF_LIFE: f64 = 1000.;

/// Parameters from which an `ExponentialMovingAverage` is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmaConfiguration {
    /// Time, in milliseconds, after which the weight of a recorded value in the average drops
    /// to one half.
    ///
    /// Has to be a finite number strictly superior to `0`.
    pub half_life_ms: f64,

    /// Value of the average before any sample is recorded.
    pub initial_value: f64,
}

impl Default for EmaConfiguration {
    fn default() -> Self {
        Self {
            half_life_ms: DEFAULT_HALF_LIFE,
            initial_value: 0.,
        }
    }
}
