use crate::{
    average::{Clock, EmaConfiguration, ExponentialMovingAverage, MonotonicClock},
    utils::logger::LoggerLevel,
    wasm_bindgen, Logger,
};

use super::LogLevel;

/// `ExponentialMovingAverage` exported to the JavaScript-side.
///
/// Timestamps are expressed in milliseconds relative to the moment this object was created,
/// which is the reference given by its `now` method.
#[wasm_bindgen]
pub struct JsExponentialMovingAverage {
    clock: MonotonicClock,
    ema: ExponentialMovingAverage,
}

#[wasm_bindgen]
impl JsExponentialMovingAverage {
    /// Create a new `JsExponentialMovingAverage`.
    ///
    /// JavaScript can't really handle construction errors, so invalid parameters are logged
    /// and replaced by their default value instead.
    ///
    /// # Arguments
    ///
    /// * `half_life_ms` - Time in milliseconds after which the weight of a value drops to 1/2.
    ///
    /// * `initial_value` - Value of the average before any sample is recorded.
    #[wasm_bindgen(constructor)]
    pub fn new(half_life_ms: f64, initial_value: f64) -> Self {
        let config = sanitize_configuration(half_life_ms, initial_value);
        let clock = MonotonicClock::new();
        let ema = ExponentialMovingAverage::from_configuration(&config, &clock)
            .unwrap_or_else(|err| {
                // Only the clock can still misbehave once the configuration is sanitized
                Logger::lazy_error(&|| format!("Could not create EMA: {err}"));
                ExponentialMovingAverage::default()
            });
        Self { clock, ema }
    }

    /// Records `value` at time `time_ms` and returns the updated average.
    pub fn record(&mut self, time_ms: f64, value: f64) -> f64 {
        self.ema.record(time_ms, value)
    }

    /// Records `value` at the current time and returns the updated average.
    pub fn record_now(&mut self, value: f64) -> f64 {
        let now = self.clock.now_ms();
        self.ema.record(now, value)
    }

    /// Returns the current value of the average.
    pub fn average(&self) -> f64 {
        self.ema.average()
    }

    pub fn last_update(&self) -> f64 {
        self.ema.last_update()
    }

    /// Returns the current timestamp, in the same time reference than the one expected by
    /// `record`.
    pub fn now(&self) -> f64 {
        self.clock.now_ms()
    }
}

/// Update the maximum level of logs emitted by this module.
#[wasm_bindgen]
pub fn set_log_level(level: LogLevel) {
    Logger::set_logger_level(match level {
        LogLevel::Error => LoggerLevel::Error,
        LogLevel::Warn => LoggerLevel::Warn,
        LogLevel::Info => LoggerLevel::Info,
        LogLevel::Debug => LoggerLevel::Debug,
    });
}

/// Completely disable logs.
#[wasm_bindgen]
pub fn disable_logs() {
    Logger::set_logger_level(LoggerLevel::None);
}

fn sanitize_configuration(half_life_ms: f64, initial_value: f64) -> EmaConfiguration {
    let default = EmaConfiguration::default();
    let half_life_ms = if half_life_ms.is_finite() && half_life_ms > 0. {
        half_life_ms
    } else {
        Logger::lazy_warn(&|| {
            format!(
                "Invalid EMA half-life {half_life_ms}, using {}ms instead",
                default.half_life_ms
            )
        });
        default.half_life_ms
    };
    let initial_value = if initial_value.is_finite() {
        initial_value
    } else {
        Logger::lazy_warn(&|| {
            format!(
                "Invalid EMA initial value {initial_value}, using {} instead",
                default.initial_value
            )
        });
        default.initial_value
    };
    EmaConfiguration {
        half_life_ms,
        initial_value,
    }
}
