//! CloudWatch Logs Client Wrapper
//!
//! Retrieval operations over a [`ClientSession`]: exhaustive listing of groups and streams,
//! a bounded event page and the group detail lookup.

#![warn(clippy::all, rust_2018_idioms)]

use std::future::Future;

use super::error::FetchError;
use super::session::ClientSession;
use super::types::{
    sort_events, sort_groups, sort_streams, EventQuery, GroupDetail, LogEvent, LogGroup,
    LogStream, Page,
};

/// CloudWatch Logs client wrapper
#[derive(Clone, Debug)]
pub struct CloudWatchLogsClient {
    session: ClientSession,
}

/// Request pages until the service stops returning a continuation token.
///
/// A token identical to the one just sent also ends the loop, so a misbehaving endpoint
/// cannot keep us paginating forever. Any page error aborts the whole listing.
async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let sent_token = next_token.clone();
        let page = fetch_page(next_token.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_token {
            Some(token) if Some(&token) != sent_token.as_ref() => next_token = Some(token),
            Some(token) => {
                log_warn!("Service repeated pagination token {}, stopping after {} pages", token, pages);
                break;
            }
            None => break,
        }
    }

    log_debug!("Collected {} items over {} pages", items.len(), pages);
    Ok(items)
}

impl CloudWatchLogsClient {
    pub fn new(session: ClientSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// All log groups, ascending by name
    pub async fn list_log_groups(&self) -> Result<Vec<LogGroup>, FetchError> {
        let api = self.session.api();
        let mut groups = collect_pages(|token| api.describe_log_groups(None, token)).await?;
        sort_groups(&mut groups);
        Ok(groups)
    }

    /// All streams of a group, most recently active first
    pub async fn list_log_streams(&self, log_group_name: &str) -> Result<Vec<LogStream>, FetchError> {
        let api = self.session.api();
        let mut streams =
            collect_pages(|token| api.describe_log_streams(log_group_name, token)).await?;
        sort_streams(&mut streams);
        Ok(streams)
    }

    /// A single page of at most `query.limit` events in chronological order
    pub async fn get_log_events(&self, query: &EventQuery) -> Result<Vec<LogEvent>, FetchError> {
        let mut events = self.session.api().get_log_events(query).await?;

        let limit = usize::try_from(query.limit.max(0)).unwrap_or(0);
        if events.len() > limit {
            log_warn!(
                "GetLogEvents returned {} events for a limit of {}, truncating",
                events.len(),
                limit
            );
            events.truncate(limit);
        }
        sort_events(&mut events);
        Ok(events)
    }

    /// Metadata of one group, looked up by name prefix then exact name.
    ///
    /// Only the first page of the prefix lookup is searched. Failures are logged and reported
    /// as `None`; callers treat missing detail as non-fatal.
    pub async fn load_group_detail(&self, log_group_name: &str) -> Option<GroupDetail> {
        match self
            .session
            .api()
            .describe_log_groups(Some(log_group_name), None)
            .await
        {
            Ok(page) => {
                let detail = page
                    .items
                    .into_iter()
                    .find(|group| group.name.as_deref() == Some(log_group_name))
                    .map(|group| group.detail());
                if detail.is_none() {
                    log_debug!("No exact match for log group {}", log_group_name);
                }
                detail
            }
            Err(e) => {
                log_warn!("Failed loading log group details for {}: {}", log_group_name, e);
                None
            }
        }
    }
}
