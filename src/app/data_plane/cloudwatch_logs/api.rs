//! CloudWatch Logs service API
//!
//! [`LogsApi`] exposes one method per SDK call, each returning a single page. Pagination,
//! ordering and bounding live in [`super::client::CloudWatchLogsClient`] so they work the same
//! against the real service and against in-memory implementations.

#![warn(clippy::all, rust_2018_idioms)]

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_smithy_types::error::display::DisplayErrorContext;

use super::error::FetchError;
use super::types::{EventQuery, LogEvent, LogGroup, LogStream, Page};

/// Read-only CloudWatch Logs operations used by the browser
#[async_trait]
pub trait LogsApi: Send + Sync {
    /// One page of `DescribeLogGroups`, optionally restricted to a name prefix
    async fn describe_log_groups(
        &self,
        name_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError>;

    /// One page of `DescribeLogStreams` for a group
    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStream>, FetchError>;

    /// A single `GetLogEvents` page
    async fn get_log_events(&self, query: &EventQuery) -> Result<Vec<LogEvent>, FetchError>;
}

/// [`LogsApi`] backed by the AWS SDK
#[derive(Clone)]
pub struct SdkLogsApi {
    client: cloudwatchlogs::Client,
}

impl SdkLogsApi {
    pub fn new(client: cloudwatchlogs::Client) -> Self {
        Self { client }
    }
}

fn service_error<E>(operation: &'static str, err: E) -> FetchError
where
    E: std::error::Error,
{
    FetchError::service(operation, DisplayErrorContext(&err).to_string())
}

impl From<cloudwatchlogs::types::LogGroup> for LogGroup {
    fn from(group: cloudwatchlogs::types::LogGroup) -> Self {
        Self {
            name: group.log_group_name,
            arn: group.log_group_arn.or(group.arn),
            retention_in_days: group.retention_in_days,
            creation_time: group.creation_time,
        }
    }
}

impl From<cloudwatchlogs::types::LogStream> for LogStream {
    fn from(stream: cloudwatchlogs::types::LogStream) -> Self {
        Self {
            name: stream.log_stream_name,
            last_event_timestamp: stream.last_event_timestamp,
        }
    }
}

impl From<cloudwatchlogs::types::OutputLogEvent> for LogEvent {
    fn from(event: cloudwatchlogs::types::OutputLogEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            message: event.message,
            ingestion_time: event.ingestion_time,
        }
    }
}

#[async_trait]
impl LogsApi for SdkLogsApi {
    async fn describe_log_groups(
        &self,
        name_prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError> {
        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(name_prefix.map(str::to_string))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| service_error("DescribeLogGroups", e))?;

        Ok(Page {
            items: response
                .log_groups
                .unwrap_or_default()
                .into_iter()
                .map(LogGroup::from)
                .collect(),
            next_token: response.next_token,
        })
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<LogStream>, FetchError> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(log_group_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| service_error("DescribeLogStreams", e))?;

        Ok(Page {
            items: response
                .log_streams
                .unwrap_or_default()
                .into_iter()
                .map(LogStream::from)
                .collect(),
            next_token: response.next_token,
        })
    }

    async fn get_log_events(&self, query: &EventQuery) -> Result<Vec<LogEvent>, FetchError> {
        let response = self
            .client
            .get_log_events()
            .log_group_name(&query.log_group_name)
            .log_stream_name(&query.log_stream_name)
            .limit(query.limit)
            .start_from_head(query.start_from_head)
            .send()
            .await
            .map_err(|e| service_error("GetLogEvents", e))?;

        Ok(response
            .events
            .unwrap_or_default()
            .into_iter()
            .map(LogEvent::from)
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted in-memory [`LogsApi`]

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves items split into pages; page `n > 0` is requested with token `"page-n"`.
    #[derive(Default)]
    pub(crate) struct FakeLogsApi {
        pub group_pages: Vec<Vec<LogGroup>>,
        pub stream_pages: HashMap<String, Vec<Vec<LogStream>>>,
        pub events: HashMap<(String, String), Vec<LogEvent>>,
        pub fail_groups_on_page: Option<usize>,
        pub fail_streams: bool,
        pub fail_events: Option<String>,
        pub calls: Mutex<Vec<String>>,
    }

    fn page_index(token: Option<&str>) -> usize {
        token
            .and_then(|t| t.strip_prefix("page-"))
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    fn serve<T: Clone>(pages: &[Vec<T>], index: usize) -> Page<T> {
        let items = pages.get(index).cloned().unwrap_or_default();
        if index + 1 < pages.len() {
            Page::with_token(items, format!("page-{}", index + 1))
        } else {
            Page::last(items)
        }
    }

    impl FakeLogsApi {
        pub fn with_groups(pages: Vec<Vec<LogGroup>>) -> Self {
            Self {
                group_pages: pages,
                ..Self::default()
            }
        }

        pub fn streams(mut self, group: &str, pages: Vec<Vec<LogStream>>) -> Self {
            self.stream_pages.insert(group.to_string(), pages);
            self
        }

        pub fn events(mut self, group: &str, stream: &str, events: Vec<LogEvent>) -> Self {
            self.events
                .insert((group.to_string(), stream.to_string()), events);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl LogsApi for FakeLogsApi {
        async fn describe_log_groups(
            &self,
            name_prefix: Option<&str>,
            next_token: Option<String>,
        ) -> Result<Page<LogGroup>, FetchError> {
            let index = page_index(next_token.as_deref());
            self.record(format!("groups:{}:{}", name_prefix.unwrap_or("*"), index));

            if self.fail_groups_on_page == Some(index) {
                return Err(FetchError::service("DescribeLogGroups", "throttled"));
            }

            if let Some(prefix) = name_prefix {
                let matching = self
                    .group_pages
                    .iter()
                    .flatten()
                    .filter(|g| g.sort_key().starts_with(prefix))
                    .cloned()
                    .collect();
                return Ok(Page::last(matching));
            }

            Ok(serve(&self.group_pages, index))
        }

        async fn describe_log_streams(
            &self,
            log_group_name: &str,
            next_token: Option<String>,
        ) -> Result<Page<LogStream>, FetchError> {
            let index = page_index(next_token.as_deref());
            self.record(format!("streams:{}:{}", log_group_name, index));

            if self.fail_streams {
                return Err(FetchError::service("DescribeLogStreams", "access denied"));
            }

            let pages = self
                .stream_pages
                .get(log_group_name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            Ok(serve(pages, index))
        }

        async fn get_log_events(&self, query: &EventQuery) -> Result<Vec<LogEvent>, FetchError> {
            self.record(format!(
                "events:{}:{}:{}",
                query.log_group_name, query.log_stream_name, query.limit
            ));

            if let Some(message) = &self.fail_events {
                return Err(FetchError::service("GetLogEvents", message.clone()));
            }

            Ok(self
                .events
                .get(&(query.log_group_name.clone(), query.log_stream_name.clone()))
                .cloned()
                .unwrap_or_default())
        }
    }
}
