//! Desktop user interface for Cloud Visualizer.
//!
//! [`app::DashApp`] owns the [`crate::app::data_plane::LogBrowserController`] and the
//! configuration it authenticates from. Each frame it drains finished background work
//! with `poll()` and then renders the controller state through
//! [`cloudwatch_logs_window::CloudWatchLogsWindow`]. Windows never talk to the SDK.
//!
//! ## Theme Support
//! - Latte, Frappe, Macchiato and Mocha color schemes via Catppuccin
//! - The chosen theme is saved with eframe storage and restored on startup

pub mod app;
pub mod cloudwatch_logs_window;
pub mod menu;

pub use app::DashApp;
pub use cloudwatch_logs_window::{CloudWatchLogsWindow, LogsWindowAction};
