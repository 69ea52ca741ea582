use wasm_bindgen::prelude::*;

pub mod average;
pub mod bindings;
mod utils;

pub use average::{
    Clock, EmaConfiguration, EmaError, ExponentialMovingAverage, ManualClock, MonotonicClock,
    SharedExponentialMovingAverage,
};
pub(crate) use utils::logger::Logger;
