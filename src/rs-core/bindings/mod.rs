mod exports;
mod js_functions;

pub use exports::{disable_logs, set_log_level, JsExponentialMovingAverage};
pub use js_functions::LogLevel;

// Only callable from a JavaScript host.
#[cfg(target_arch = "wasm32")]
pub(crate) use js_functions::{jsLog, jsNow};
