//! Log browser controller
//!
//! Owns every piece of presentation state for the CloudWatch Logs browser and is the only
//! code that mutates it. User actions start background tasks on the tokio runtime; each task
//! runs one fetch and sends its result back over a channel. [`LogBrowserController::poll`]
//! drains the channel on the UI thread and applies the results.
//!
//! Every request captures the generation of its lane (groups, group detail, streams, events)
//! when it is started. Starting a newer request in the same lane, opening another group or
//! changing the session bumps the generation, and a result whose generation no longer matches
//! is dropped instead of overwriting newer state.

#![warn(clippy::all, rust_2018_idioms)]

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::client::CloudWatchLogsClient;
use super::error::FetchError;
use super::session::ClientSession;
use super::types::{EventQuery, GroupDetail, LogEvent, LogGroup, LogStream};

type RepaintCallback = Arc<dyn Fn() + Send + Sync>;

/// Stream and event selection of the currently opened group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_group: Option<LogGroup>,
    pub selected_stream_name: Option<String>,
    pub loaded_events: Vec<LogEvent>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventsStatus {
    Loading,
    Loaded,
    Error,
}

/// Where the browser currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserPhase {
    NoSession,
    /// Session ready, group list not requested yet
    Connected,
    GroupsLoading,
    GroupsLoaded,
    GroupSelected { streams_loading: bool },
    StreamSelected(EventsStatus),
}

#[derive(Debug, Default, Clone, Copy)]
struct Generations {
    groups: u64,
    detail: u64,
    streams: u64,
    events: u64,
}

impl Generations {
    fn bump_group_view(&mut self) {
        self.detail += 1;
        self.streams += 1;
        self.events += 1;
    }

    fn bump_all(&mut self) {
        self.groups += 1;
        self.bump_group_view();
    }
}

#[derive(Debug)]
enum TaskResult {
    Groups {
        generation: u64,
        result: Result<Vec<LogGroup>, FetchError>,
    },
    Detail {
        generation: u64,
        detail: Option<GroupDetail>,
    },
    Streams {
        generation: u64,
        result: Result<Vec<LogStream>, FetchError>,
        refresh_events: bool,
    },
    Events {
        generation: u64,
        stream: String,
        result: Result<Vec<LogEvent>, FetchError>,
    },
}

pub struct LogBrowserController {
    runtime: Handle,
    sender: UnboundedSender<TaskResult>,
    receiver: UnboundedReceiver<TaskResult>,
    repaint: Option<RepaintCallback>,
    in_flight: usize,
    generations: Generations,

    client: Option<CloudWatchLogsClient>,
    event_limit: i32,

    groups: Vec<LogGroup>,
    groups_loading: bool,
    groups_loaded: bool,
    streams: Vec<LogStream>,
    streams_loading: bool,
    group_detail: Option<GroupDetail>,
    selection: SelectionState,
}

impl LogBrowserController {
    pub fn new(runtime: Handle, event_limit: i32) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            runtime,
            sender,
            receiver,
            repaint: None,
            in_flight: 0,
            generations: Generations::default(),
            client: None,
            event_limit: event_limit.max(1),
            groups: Vec::new(),
            groups_loading: false,
            groups_loaded: false,
            streams: Vec::new(),
            streams_loading: false,
            group_detail: None,
            selection: SelectionState::default(),
        }
    }

    /// Called from background tasks once their result has been queued
    pub fn set_repaint_callback(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.repaint = Some(Arc::new(callback));
    }

    // ---------------------------------------------------------------------
    // State accessors
    // ---------------------------------------------------------------------

    pub fn session(&self) -> Option<&ClientSession> {
        self.client.as_ref().map(CloudWatchLogsClient::session)
    }

    pub fn groups(&self) -> &[LogGroup] {
        &self.groups
    }

    pub fn groups_loading(&self) -> bool {
        self.groups_loading
    }

    pub fn streams(&self) -> &[LogStream] {
        &self.streams
    }

    pub fn streams_loading(&self) -> bool {
        self.streams_loading
    }

    pub fn group_detail(&self) -> Option<&GroupDetail> {
        self.group_detail.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn event_limit(&self) -> i32 {
        self.event_limit
    }

    /// Number of started tasks whose result has not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn phase(&self) -> BrowserPhase {
        if self.client.is_none() {
            return BrowserPhase::NoSession;
        }
        if self.selection.selected_group.is_none() {
            return if self.groups_loading {
                BrowserPhase::GroupsLoading
            } else if self.groups_loaded {
                BrowserPhase::GroupsLoaded
            } else {
                BrowserPhase::Connected
            };
        }
        if self.selection.selected_stream_name.is_none() {
            return BrowserPhase::GroupSelected {
                streams_loading: self.streams_loading,
            };
        }
        let status = if self.selection.is_loading {
            EventsStatus::Loading
        } else if self.selection.last_error.is_some() {
            EventsStatus::Error
        } else {
            EventsStatus::Loaded
        };
        BrowserPhase::StreamSelected(status)
    }

    // ---------------------------------------------------------------------
    // User actions
    // ---------------------------------------------------------------------

    /// Replace the session. Returns `false` if `session` is the current one.
    ///
    /// A change resets all state; results of requests issued under the old session are
    /// discarded when they arrive.
    pub fn set_session(&mut self, session: Option<ClientSession>) -> bool {
        if self.session() == session.as_ref() {
            return false;
        }

        log_info!(
            "Log browser session changed: {:?}",
            session.as_ref().map(ClientSession::id)
        );
        self.generations.bump_all();
        self.client = session.map(CloudWatchLogsClient::new);
        self.groups.clear();
        self.groups_loading = false;
        self.groups_loaded = false;
        self.reset_group_view();
        true
    }

    /// Load the group list unless it has been loaded (or is loading) for this session
    pub fn ensure_groups_loaded(&mut self) {
        if !self.groups_loaded && !self.groups_loading {
            self.refresh_groups();
        }
    }

    /// Re-run the group listing
    pub fn refresh_groups(&mut self) {
        let Some(client) = self.client.clone() else {
            log_debug!("refresh_groups ignored: no session");
            return;
        };

        self.generations.groups += 1;
        let generation = self.generations.groups;
        self.groups_loading = true;

        self.spawn(async move {
            TaskResult::Groups {
                generation,
                result: client.list_log_groups().await,
            }
        });
    }

    /// Enter the group view: load its detail and its streams concurrently
    pub fn open_group(&mut self, group: LogGroup) {
        let Some(client) = self.client.clone() else {
            log_debug!("open_group ignored: no session");
            return;
        };
        let Some(name) = group.name.clone() else {
            log_warn!("Cannot open a log group without a name");
            return;
        };

        log_info!("Opening log group {}", name);
        self.reset_group_view();
        self.selection.selected_group = Some(group);

        let generation = self.generations.detail;
        let detail_client = client.clone();
        let detail_name = name.clone();
        self.spawn(async move {
            TaskResult::Detail {
                generation,
                detail: detail_client.load_group_detail(&detail_name).await,
            }
        });

        self.start_streams(client, name, false);
    }

    /// Leave the group view and return to the group table
    pub fn close_group(&mut self) {
        self.reset_group_view();
    }

    /// Show the events of `stream_name` in the opened group
    pub fn select_stream(&mut self, stream_name: impl Into<String>) {
        if self.selection.selected_group.is_none() {
            log_debug!("select_stream ignored: no group opened");
            return;
        }
        let stream_name = stream_name.into();
        if self.selection.selected_stream_name.as_deref() != Some(stream_name.as_str()) {
            self.selection.loaded_events.clear();
        }
        self.selection.selected_stream_name = Some(stream_name.clone());
        self.start_events(stream_name);
    }

    /// Reload the stream list, then the selected stream's events if there is one
    pub fn refresh_group(&mut self) {
        let (Some(client), Some(name)) = (self.client.clone(), self.selected_group_name()) else {
            log_debug!("refresh_group ignored: no group opened");
            return;
        };
        self.start_streams(client, name, true);
    }

    // ---------------------------------------------------------------------
    // Result handling
    // ---------------------------------------------------------------------

    /// Apply every result that has arrived. Returns `true` if anything was applied.
    pub fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Ok(result) = self.receiver.try_recv() {
            self.apply(result);
            applied = true;
        }
        applied
    }

    /// Wait for the next result and apply it. Returns `false` when nothing is in flight.
    pub async fn apply_next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.receiver.recv().await {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    /// Apply results until no task is left, including tasks started by applied results
    pub async fn settle(&mut self) {
        while self.apply_next().await {}
    }

    fn apply(&mut self, result: TaskResult) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match result {
            TaskResult::Groups { generation, result } => {
                if generation != self.generations.groups {
                    log_debug!("Discarding stale group list (generation {})", generation);
                    return;
                }
                self.groups_loading = false;
                self.groups_loaded = true;
                match result {
                    Ok(groups) => {
                        log_info!("Loaded {} log groups", groups.len());
                        self.groups = groups;
                    }
                    Err(e) => {
                        log_error!("Error loading log groups: {}", e);
                        self.groups.clear();
                    }
                }
            }
            TaskResult::Detail { generation, detail } => {
                if generation != self.generations.detail {
                    log_debug!("Discarding stale group detail (generation {})", generation);
                    return;
                }
                self.group_detail = detail;
            }
            TaskResult::Streams {
                generation,
                result,
                refresh_events,
            } => {
                if generation != self.generations.streams {
                    log_debug!("Discarding stale stream list (generation {})", generation);
                    return;
                }
                self.streams_loading = false;
                match result {
                    Ok(streams) => {
                        log_info!("Loaded {} log streams", streams.len());
                        self.streams = streams;
                    }
                    Err(e) => {
                        log_error!(
                            "Failed loading log streams for {}: {}",
                            self.selected_group_name().unwrap_or_default(),
                            e
                        );
                        self.streams.clear();
                    }
                }

                match self.selection.selected_stream_name.clone() {
                    None => {
                        if let Some(newest) = self.streams.first().and_then(|s| s.name.clone()) {
                            log_debug!("Auto-selecting most recent stream {}", newest);
                            self.selection.selected_stream_name = Some(newest.clone());
                            self.start_events(newest);
                        }
                    }
                    Some(selected) if refresh_events => self.start_events(selected),
                    Some(_) => {}
                }
            }
            TaskResult::Events {
                generation,
                stream,
                result,
            } => {
                if generation != self.generations.events
                    || self.selection.selected_stream_name.as_deref() != Some(stream.as_str())
                {
                    log_debug!("Discarding stale events for stream {}", stream);
                    return;
                }
                self.selection.is_loading = false;
                match result {
                    Ok(events) => {
                        log_info!("Loaded {} log events from {}", events.len(), stream);
                        self.selection.loaded_events = events;
                        self.selection.last_error = None;
                    }
                    Err(e) => {
                        log_error!("Failed loading log events: {}", e);
                        self.selection.loaded_events.clear();
                        self.selection.last_error = Some(format!("Failed to load events: {}", e));
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn selected_group_name(&self) -> Option<String> {
        self.selection
            .selected_group
            .as_ref()
            .and_then(|group| group.name.clone())
    }

    fn reset_group_view(&mut self) {
        self.generations.bump_group_view();
        self.selection = SelectionState::default();
        self.streams.clear();
        self.streams_loading = false;
        self.group_detail = None;
    }

    fn start_streams(&mut self, client: CloudWatchLogsClient, group: String, refresh_events: bool) {
        self.generations.streams += 1;
        let generation = self.generations.streams;
        self.streams_loading = true;

        self.spawn(async move {
            TaskResult::Streams {
                generation,
                result: client.list_log_streams(&group).await,
                refresh_events,
            }
        });
    }

    fn start_events(&mut self, stream: String) {
        let (Some(client), Some(group)) = (self.client.clone(), self.selected_group_name()) else {
            return;
        };

        self.generations.events += 1;
        let generation = self.generations.events;
        self.selection.is_loading = true;
        self.selection.last_error = None;

        let query = EventQuery::new(group, stream.clone()).with_limit(self.event_limit);
        self.spawn(async move {
            TaskResult::Events {
                generation,
                stream,
                result: client.get_log_events(&query).await,
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let result = task.await;
            // The receiver lives as long as the controller; a send error means it is gone.
            if sender.send(result).is_ok() {
                if let Some(repaint) = repaint {
                    repaint();
                }
            }
        });
    }
}
