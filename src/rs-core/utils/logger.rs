use std::sync::atomic::{AtomicU8, Ordering};

#[cfg(target_arch = "wasm32")]
use crate::bindings::{jsLog, LogLevel};

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(LoggerLevel::Warn as u8);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub(crate) enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

/// Logs are sent to the JavaScript console when running as a WebAssembly module, and to the
/// `log` facade otherwise, letting the embedding application pick where they go.
///
/// `MAX_LOG_LEVEL` filters logs before they are even formatted, which matters for the `lazy_*`
/// variants called on hot paths.
pub(crate) struct Logger {}

impl Logger {
    pub(crate) fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, Ordering::Relaxed);
    }

    pub(crate) fn is_enabled(level: LoggerLevel) -> bool {
        level != LoggerLevel::None && MAX_LOG_LEVEL.load(Ordering::Relaxed) >= level as u8
    }

    pub(crate) fn lazy_error(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Error) {
            emit(LoggerLevel::Error, &func());
        }
    }

    pub(crate) fn lazy_warn(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Warn) {
            emit(LoggerLevel::Warn, &func());
        }
    }

    pub(crate) fn lazy_debug(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Debug) {
            emit(LoggerLevel::Debug, &func());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: LoggerLevel, text: &str) {
    let js_level = match level {
        LoggerLevel::None => return,
        LoggerLevel::Error => LogLevel::Error,
        LoggerLevel::Warn => LogLevel::Warn,
        LoggerLevel::Info => LogLevel::Info,
        LoggerLevel::Debug => LogLevel::Debug,
    };
    jsLog(js_level, text);
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: LoggerLevel, text: &str) {
    let log_level = match level {
        LoggerLevel::None => return,
        LoggerLevel::Error => log::Level::Error,
        LoggerLevel::Warn => log::Level::Warn,
        LoggerLevel::Info => log::Level::Info,
        LoggerLevel::Debug => log::Level::Debug,
    };
    log::log!(target: "time_ema", log_level, "{}", text);
}
