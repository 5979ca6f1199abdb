//! Cloud Visualizer - AWS CloudWatch Logs Browser
//!
//! Cloud Visualizer is a desktop application for browsing AWS CloudWatch Logs through native
//! egui windows: list the log groups of an account, drill into a group's log streams and read
//! the events of a stream.
//!
//! # Architecture Overview
//!
//! - **UI Layer** ([`app::dashui`]): eframe application and the CloudWatch Logs window
//! - **Data Plane** ([`app::data_plane`]): CloudWatch Logs session, listing operations and the
//!   selection controller that owns all presentation state
//! - **Configuration** ([`app::config`]): region, endpoint and credential resolution
//!
//! Every network call runs as a single tokio task whose result is sent back to the UI thread
//! and applied by [`app::data_plane::cloudwatch_logs::LogBrowserController`]. Results that
//! arrive for a superseded selection are discarded using request generations.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::DashApp;

use once_cell::sync::OnceCell;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Default filter directives for the application log file
pub const DEFAULT_LOG_FILTER: &str = "cloudviz=info,eframe=info,egui=warn,wgpu=warn,winit=warn,aws_config=warn,aws_sigv4=warn,aws_smithy_runtime=warn,aws_smithy_runtime_api=warn,hyper=warn,aws_smithy_http=warn";

/// Extra directives enabling request/response logging of the AWS SDK
pub const SDK_WIRE_LOG_FILTER: &str =
    "aws_smithy_runtime=trace,aws_smithy_runtime_api=trace,aws_sigv4=debug";

/// Build the file log filter from `RUST_LOG` (if given), falling back to
/// [`DEFAULT_LOG_FILTER`] when it is missing or invalid.
///
/// Returns the filter together with the directives it was actually built from; those are the
/// base that [`set_sdk_wire_logging`] extends later.
pub fn resolve_log_filter(requested: Option<&str>) -> (EnvFilter, String) {
    if let Some(directives) = requested {
        match EnvFilter::builder().parse(directives) {
            Ok(filter) => return (filter, directives.to_string()),
            Err(e) => eprintln!("Invalid RUST_LOG '{}': {}, using defaults", directives, e),
        }
    }
    (
        EnvFilter::new(DEFAULT_LOG_FILTER),
        DEFAULT_LOG_FILTER.to_string(),
    )
}

pub type TracingReloadHandle = reload::Handle<EnvFilter, Registry>;

static TRACING_RELOAD: OnceCell<(TracingReloadHandle, String)> = OnceCell::new();

/// Store the reload handle of the global filter so it can be changed at runtime.
///
/// `base_filter` is the directive string the filter was built from.
pub fn set_tracing_reload_handle(handle: TracingReloadHandle, base_filter: impl Into<String>) {
    if TRACING_RELOAD.set((handle, base_filter.into())).is_err() {
        tracing::warn!("Tracing reload handle already installed");
    }
}

/// Toggle verbose AWS SDK wire logging on the global filter.
///
/// Returns `false` when no reloadable subscriber is installed (tests, tokio-console mode).
pub fn set_sdk_wire_logging(enabled: bool) -> bool {
    let Some((handle, base)) = TRACING_RELOAD.get() else {
        tracing::debug!("No reloadable tracing filter installed, wire logging unchanged");
        return false;
    };

    let directives = if enabled {
        format!("{},{}", base, SDK_WIRE_LOG_FILTER)
    } else {
        base.clone()
    };

    match EnvFilter::builder().parse(&directives) {
        Ok(filter) => match handle.reload(filter) {
            Ok(()) => {
                tracing::info!("AWS SDK wire logging {}", if enabled { "enabled" } else { "disabled" });
                true
            }
            Err(e) => {
                tracing::warn!("Failed to reload tracing filter: {}", e);
                false
            }
        },
        Err(e) => {
            tracing::warn!("Invalid tracing filter '{}': {}", directives, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        assert!(EnvFilter::builder().parse(DEFAULT_LOG_FILTER).is_ok());
        assert!(EnvFilter::builder()
            .parse(format!("{},{}", DEFAULT_LOG_FILTER, SDK_WIRE_LOG_FILTER))
            .is_ok());
    }

    #[test]
    fn test_resolve_log_filter_keeps_valid_directives() {
        let (_, directives) = resolve_log_filter(Some("cloudviz=debug"));
        assert_eq!(directives, "cloudviz=debug");

        let (_, directives) = resolve_log_filter(None);
        assert_eq!(directives, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_invalid_log_filter_falls_back_to_default_directives() {
        let (_, directives) = resolve_log_filter(Some("cloudviz=loudest"));
        assert_eq!(directives, DEFAULT_LOG_FILTER);

        // The reload base must still accept the wire logging directives
        assert!(EnvFilter::builder()
            .parse(format!("{},{}", directives, SDK_WIRE_LOG_FILTER))
            .is_ok());
    }

    #[test]
    fn test_wire_logging_without_subscriber() {
        // No subscriber is installed in unit tests
        assert!(!set_sdk_wire_logging(true));
    }
}
