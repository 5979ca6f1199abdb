//! UI tests of the CloudWatch Logs window using egui_kittest

use async_trait::async_trait;
use cloudviz::app::dashui::{CloudWatchLogsWindow, LogsWindowAction};
use cloudviz::app::data_plane::cloudwatch_logs::{
    ClientSession, EventQuery, FetchError, LogBrowserController, LogEvent, LogGroup, LogStream,
    LogsApi, Page,
};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use std::sync::{Arc, Mutex};

/// Two groups; only `/app/web` has a stream, and that stream has no events
struct TwoGroupsApi;

#[async_trait]
impl LogsApi for TwoGroupsApi {
    async fn describe_log_groups(
        &self,
        _name_prefix: Option<&str>,
        _next_token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError> {
        Ok(Page::last(vec![
            LogGroup::named("/app/worker"),
            LogGroup::named("/app/web"),
        ]))
    }

    async fn describe_log_streams(
        &self,
        log_group_name: &str,
        _next_token: Option<String>,
    ) -> Result<Page<LogStream>, FetchError> {
        let streams = if log_group_name == "/app/web" {
            vec![LogStream::new("web-1", Some(1_000))]
        } else {
            Vec::new()
        };
        Ok(Page::last(streams))
    }

    async fn get_log_events(&self, _query: &EventQuery) -> Result<Vec<LogEvent>, FetchError> {
        Ok(Vec::new())
    }
}

struct WindowState {
    window: CloudWatchLogsWindow,
    controller: LogBrowserController,
    last_action: Option<LogsWindowAction>,
}

fn harness_for(state: Arc<Mutex<WindowState>>) -> Harness<'static> {
    Harness::new(move |ctx| {
        let mut guard = state.lock().unwrap();
        let WindowState {
            window,
            controller,
            last_action,
        } = &mut *guard;
        if let Some(action) = window.show(ctx, controller) {
            *last_action = Some(action);
        }
    })
}

fn connected_state(runtime: &tokio::runtime::Runtime) -> Arc<Mutex<WindowState>> {
    let mut controller = LogBrowserController::new(runtime.handle().clone(), 100);
    controller.set_session(Some(ClientSession::with_api(
        "eu-west-1",
        None,
        Arc::new(TwoGroupsApi),
    )));
    controller.ensure_groups_loaded();
    runtime.block_on(controller.settle());

    Arc::new(Mutex::new(WindowState {
        window: CloudWatchLogsWindow::default(),
        controller,
        last_action: None,
    }))
}

#[test]
fn test_disconnected_window_requests_connect() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = Arc::new(Mutex::new(WindowState {
        window: CloudWatchLogsWindow::default(),
        controller: LogBrowserController::new(runtime.handle().clone(), 100),
        last_action: None,
    }));
    let mut harness = harness_for(state.clone());

    harness.step();
    harness.step();
    assert!(harness.query_by_label("Not connected").is_some());

    harness.get_by_label("Connect").click();
    harness.step();
    harness.step();

    assert_eq!(state.lock().unwrap().last_action, Some(LogsWindowAction::Connect));
}

#[test]
fn test_group_table_lists_groups() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = connected_state(&runtime);
    let mut harness = harness_for(state.clone());

    // First frame is the window's sizing pass
    harness.step();
    harness.step();

    assert!(harness.query_by_label("Log Group Name").is_some());
    assert!(harness.query_by_label("/app/web").is_some());
    assert!(harness.query_by_label("/app/worker").is_some());
    assert!(harness.query_by_label("2 of 2 log groups").is_some());
}

#[test]
fn test_group_without_streams_shows_stream_placeholder() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = connected_state(&runtime);
    {
        let mut guard = state.lock().unwrap();
        guard.controller.open_group(LogGroup::named("/app/worker"));
        runtime.block_on(guard.controller.settle());
    }
    let mut harness = harness_for(state.clone());

    // First frame is the window's sizing pass
    harness.step();
    harness.step();

    assert!(harness.query_by_label("Select a Log Stream").is_some());
}

#[test]
fn test_stream_without_events_shows_empty_state() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let state = connected_state(&runtime);
    {
        let mut guard = state.lock().unwrap();
        guard.controller.open_group(LogGroup::named("/app/web"));
        runtime.block_on(guard.controller.settle());
        assert_eq!(
            guard.controller.selection().selected_stream_name.as_deref(),
            Some("web-1")
        );
    }
    let mut harness = harness_for(state.clone());

    // First frame is the window's sizing pass
    harness.step();
    harness.step();

    assert!(harness.query_by_label("No log events found").is_some());
}
