//! Data Plane Services Module
//!
//! AWS data plane integrations: services that read data stored inside AWS resources,
//! as opposed to control plane operations that manage the resources themselves.
//!
//! ## Available Services
//!
//! - **CloudWatch Logs**: browse log groups, log streams and log events
//!
//! ## Architecture
//!
//! ```text
//! 1. Service API layer (LogsApi)
//!    └─ One method per SDK call, returns a single page
//!
//! 2. Client layer (CloudWatchLogsClient)
//!    └─ Pagination exhaustion, ordering, bounding
//!
//! 3. Controller layer (LogBrowserController)
//!    └─ Background tasks, selection state, stale response guard
//!
//! 4. UI Viewer Window (app::dashui)
//!    └─ Renders controller state, forwards user actions
//! ```

pub mod cloudwatch_logs;

pub use cloudwatch_logs::{CloudWatchLogsClient, LogBrowserController};
