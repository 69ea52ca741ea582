pub use self::clock::{Clock, ManualClock, MonotonicClock};
pub use self::configuration::EmaConfiguration;
pub use self::ema::ExponentialMovingAverage;
pub use self::shared::SharedExponentialMovingAverage;

mod clock;
mod configuration;
mod ema;
mod shared;

use thiserror::Error;

/// Error encountered when creating an `ExponentialMovingAverage`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EmaError {
    #[error("The half-life should be a finite number superior to 0, got {0}")]
    InvalidHalfLife(f64),
    #[error("The initial value should be a finite number, got {0}")]
    InvalidInitialValue(f64),
    #[error("The starting timestamp should be a finite number, got {0}")]
    InvalidTimestamp(f64),
}
