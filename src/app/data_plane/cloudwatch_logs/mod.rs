//! CloudWatch Logs Integration Module
//!
//! Browse AWS CloudWatch Logs: list log groups, drill into a group's log streams and read a
//! bounded page of events from a stream.
//!
//! ## Features
//!
//! - Session creation from static credentials with an optional endpoint override
//! - Exhaustive pagination of log groups and log streams
//! - Bounded, chronological event retrieval from the head of a stream
//! - Selection controller with stale response protection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloudviz::app::data_plane::cloudwatch_logs::{
//!     authenticate, CloudWatchLogsClient, EventQuery, StaticCredentials,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = StaticCredentials::new("AKIA...", "secret");
//! let session = authenticate(&credentials, "us-east-1", None, false)?;
//! let client = CloudWatchLogsClient::new(session);
//!
//! for group in client.list_log_groups().await? {
//!     println!("{}", group.sort_key());
//! }
//!
//! let events = client
//!     .get_log_events(&EventQuery::new("/aws/lambda/my-function", "2024/01/01/[$LATEST]abc"))
//!     .await?;
//! println!("{} events", events.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod api;
pub mod client;
pub mod controller;
pub mod error;
pub mod presentation;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use api::{LogsApi, SdkLogsApi};
pub use client::CloudWatchLogsClient;
pub use controller::{BrowserPhase, EventsStatus, LogBrowserController, SelectionState};
pub use error::{AuthError, FetchError};
pub use session::{authenticate, ClientSession, StaticCredentials};
pub use types::{
    EventQuery, GroupDetail, LogEvent, LogGroup, LogStream, Page, DEFAULT_EVENT_LIMIT,
};
