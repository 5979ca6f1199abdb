//! Display projections for log groups, streams and events.
//!
//! This is the only place where missing service fields become placeholder text.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::types::{GroupDetail, LogEvent, LogGroup, LogStream};

/// Placeholder for fields the service did not return
pub const NOT_AVAILABLE: &str = "N/A";

/// Column headers of the group table
pub const GROUP_TABLE_COLUMNS: [&str; 2] = ["Log Group Name", "ARN"];

/// Shown for a stream whose name is missing
pub const UNKNOWN_STREAM: &str = "Unknown stream";

/// One row of the group table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    pub name: String,
    pub arn: String,
}

impl From<&LogGroup> for GroupRow {
    fn from(group: &LogGroup) -> Self {
        Self {
            name: group.name.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            arn: group.arn.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Case-insensitive substring match on the group name.
///
/// Groups without a name never match a search; an empty search matches everything.
pub fn group_matches(group: &LogGroup, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    group
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(&search.to_lowercase()))
}

pub fn stream_label(stream: &LogStream) -> &str {
    stream.name.as_deref().unwrap_or(UNKNOWN_STREAM)
}

/// `YYYY-MM-DD HH:MM:SS.mmm` in UTC
pub fn format_full_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Abbreviated distance between `millis` and `now`, e.g. `5m ago` or `in 2h`
pub fn format_relative(millis: i64, now: DateTime<Utc>) -> String {
    let Some(then) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return NOT_AVAILABLE.to_string();
    };

    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let seconds = delta.num_seconds().unsigned_abs();

    let amount = match seconds {
        0..=59 => format!("{}s", seconds),
        60..=3_599 => format!("{}m", seconds / 60),
        3_600..=86_399 => format!("{}h", seconds / 3_600),
        86_400..=2_591_999 => format!("{}d", seconds / 86_400),
        2_592_000..=31_535_999 => format!("{}mo", seconds / 2_592_000),
        _ => format!("{}y", seconds / 31_536_000),
    };

    if future {
        format!("in {}", amount)
    } else {
        format!("{} ago", amount)
    }
}

/// Header lines of a group view: ARN, retention and creation time
pub fn detail_lines(detail: Option<&GroupDetail>) -> [(&'static str, String); 3] {
    let arn = detail
        .and_then(|d| d.arn.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let retention = match detail.and_then(|d| d.retention_in_days) {
        Some(1) => "1 day".to_string(),
        Some(days) => format!("{} days", days),
        None => NOT_AVAILABLE.to_string(),
    };
    let created = detail
        .and_then(|d| d.creation_time)
        .map(format_full_timestamp)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    [("ARN", arn), ("Retention", retention), ("Created", created)]
}

/// Fuzzy filter over loaded event messages; an empty pattern keeps everything.
///
/// Each match carries its position in `events`, which stays stable while the pattern changes.
pub fn filter_events<'a>(events: &'a [LogEvent], pattern: &str) -> Vec<(usize, &'a LogEvent)> {
    if pattern.is_empty() {
        return events.iter().enumerate().collect();
    }

    let matcher = SkimMatcherV2::default();
    events
        .iter()
        .enumerate()
        .filter(|(_, event)| {
            event
                .message
                .as_deref()
                .is_some_and(|message| matcher.fuzzy_match(message, pattern).is_some())
        })
        .collect()
}

/// Rows shown for a collapsed event message
pub const COLLAPSED_ROWS: usize = 3;

/// Characters that roughly fill the collapsed rows of a wrapped single-line message
const COLLAPSED_CHARS: usize = 240;

/// Whether a message can take more than [`COLLAPSED_ROWS`] rows once laid out
pub fn needs_expand_toggle(message: &str) -> bool {
    message.lines().count() > COLLAPSED_ROWS || message.chars().count() > COLLAPSED_CHARS
}

/// Pretty-print JSON in a log message.
///
/// A message that is entirely JSON is reformatted as a whole; otherwise the first embedded
/// object (or array) is reformatted in place with the surrounding text kept on its own lines.
/// Messages without valid JSON are returned unchanged.
pub fn format_message(message: &str) -> String {
    let trimmed = message.trim();
    if let Some(pretty) = pretty_json(trimmed) {
        return pretty;
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        let Some(start) = message.find(open) else {
            continue;
        };
        let Some(json) = balanced_prefix(&message[start..], open, close) else {
            continue;
        };
        if let Some(pretty) = pretty_json(json) {
            let before = message[..start].trim();
            let after = message[start + json.len()..].trim();
            return [before, pretty.as_str(), after]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    message.to_string()
}

fn pretty_json(candidate: &str) -> Option<String> {
    let looks_like_json = (candidate.starts_with('{') && candidate.ends_with('}'))
        || (candidate.starts_with('[') && candidate.ends_with(']'));
    if !looks_like_json {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

/// The shortest prefix of `s` (which starts with `open`) whose brackets balance,
/// ignoring brackets inside JSON strings.
fn balanced_prefix(s: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
