#![warn(clippy::all, rust_2018_idioms)]

/// Logging macros that prefix every record with `[file:module:line]`.
///
/// Records go through `tracing`; `log` records from dependencies reach the same
/// subscriber through `tracing-log`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*))
    };
}
