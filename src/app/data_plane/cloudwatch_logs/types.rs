//! CloudWatch Logs Data Types
//!
//! Snapshots of server state at fetch time. Optional service fields stay optional here;
//! placeholder text is only substituted by [`super::presentation`].

#![warn(clippy::all, rust_2018_idioms)]

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Number of events fetched for a stream when nothing else is configured
pub const DEFAULT_EVENT_LIMIT: i32 = 100;

/// A log group as returned by `DescribeLogGroups`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogGroup {
    pub name: Option<String>,
    pub arn: Option<String>,
    pub retention_in_days: Option<i32>,
    /// Creation time (Unix milliseconds)
    pub creation_time: Option<i64>,
}

impl LogGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sort and search key; a group without a name sorts first.
    pub fn sort_key(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn detail(&self) -> GroupDetail {
        GroupDetail {
            arn: self.arn.clone(),
            retention_in_days: self.retention_in_days,
            creation_time: self.creation_time,
        }
    }
}

/// A log stream as returned by `DescribeLogStreams`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogStream {
    pub name: Option<String>,
    /// Timestamp of the newest event (Unix milliseconds)
    pub last_event_timestamp: Option<i64>,
}

impl LogStream {
    pub fn new(name: impl Into<String>, last_event_timestamp: Option<i64>) -> Self {
        Self {
            name: Some(name.into()),
            last_event_timestamp,
        }
    }

    /// Recency key: streams without events count as the epoch.
    pub fn recency(&self) -> i64 {
        self.last_event_timestamp.unwrap_or(0)
    }
}

/// A single log event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event timestamp (Unix milliseconds)
    pub timestamp: Option<i64>,
    pub message: Option<String>,
    /// Time when the event was ingested (Unix milliseconds)
    pub ingestion_time: Option<i64>,
}

impl LogEvent {
    pub fn new(timestamp: i64, message: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp),
            message: Some(message.into()),
            ingestion_time: None,
        }
    }
}

/// Metadata shown in the header of a group view
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupDetail {
    pub arn: Option<String>,
    pub retention_in_days: Option<i32>,
    /// Creation time (Unix milliseconds)
    pub creation_time: Option<i64>,
}

/// One page of a paginated describe call
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_token(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Parameters of a single `GetLogEvents` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub log_group_name: String,
    pub log_stream_name: String,
    /// Maximum number of events to return
    pub limit: i32,
    /// Read from the oldest retained event instead of the newest
    pub start_from_head: bool,
}

impl EventQuery {
    pub fn new(log_group_name: impl Into<String>, log_stream_name: impl Into<String>) -> Self {
        Self {
            log_group_name: log_group_name.into(),
            log_stream_name: log_stream_name.into(),
            limit: DEFAULT_EVENT_LIMIT,
            start_from_head: true,
        }
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = limit;
        self
    }
}

/// Ascending by name
pub fn sort_groups(groups: &mut [LogGroup]) {
    groups.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
}

/// Descending by last event, streams without a timestamp last; stable on ties
pub fn sort_streams(streams: &mut [LogStream]) {
    streams.sort_by_key(|stream| Reverse(stream.recency()));
}

/// Chronological; stable so events sharing a timestamp keep service order
pub fn sort_events(events: &mut [LogEvent]) {
    events.sort_by_key(|event| event.timestamp.unwrap_or(0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(streams: &[LogStream]) -> Vec<&str> {
        streams.iter().filter_map(|s| s.name.as_deref()).collect()
    }

    #[test]
    fn test_sort_groups_by_name() {
        let mut groups = vec![
            LogGroup::named("/aws/lambda/b"),
            LogGroup::default(),
            LogGroup::named("/aws/lambda/a"),
        ];
        sort_groups(&mut groups);

        assert_eq!(groups[0].name, None);
        assert_eq!(groups[1].sort_key(), "/aws/lambda/a");
        assert_eq!(groups[2].sort_key(), "/aws/lambda/b");
    }

    #[test]
    fn test_sort_streams_by_recency() {
        let mut streams = vec![
            LogStream::new("s1", Some(100)),
            LogStream::new("s2", None),
            LogStream::new("s3", Some(200)),
        ];
        sort_streams(&mut streams);
        assert_eq!(names(&streams), vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn test_sort_streams_is_stable() {
        let mut streams = vec![
            LogStream::new("a", Some(5)),
            LogStream::new("none-1", None),
            LogStream::new("b", Some(5)),
            LogStream::new("none-2", None),
        ];
        sort_streams(&mut streams);
        assert_eq!(names(&streams), vec!["a", "b", "none-1", "none-2"]);
    }

    #[test]
    fn test_sort_events_chronologically() {
        let mut events = vec![
            LogEvent::new(30, "third"),
            LogEvent::new(10, "first"),
            LogEvent::new(10, "second"),
        ];
        sort_events(&mut events);
        let messages: Vec<_> = events.iter().filter_map(|e| e.message.as_deref()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_event_query_defaults() {
        let query = EventQuery::new("group", "stream");
        assert_eq!(query.limit, 100);
        assert!(query.start_from_head);
        assert_eq!(query.with_limit(5).limit, 5);
    }

    #[test]
    fn test_group_detail_projection() {
        let group = LogGroup {
            name: Some("g".to_string()),
            arn: Some("arn:aws:logs:us-east-1:123456789012:log-group:g".to_string()),
            retention_in_days: Some(14),
            creation_time: Some(1_700_000_000_000),
        };
        let detail = group.detail();
        assert_eq!(detail.retention_in_days, Some(14));
        assert_eq!(detail.creation_time, Some(1_700_000_000_000));
        assert!(detail.arn.is_some());
    }
}
