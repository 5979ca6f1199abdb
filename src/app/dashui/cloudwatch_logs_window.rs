//! CloudWatch Logs Viewer Window
//!
//! Group table with search, and a group view with the stream list on the left and the
//! selected stream's events on the right. All state lives in the
//! [`LogBrowserController`]; this window only renders it and forwards clicks.

#![warn(clippy::all, rust_2018_idioms)]

use crate::app::data_plane::cloudwatch_logs::presentation::{
    detail_lines, filter_events, format_full_timestamp, format_message, format_relative,
    group_matches, needs_expand_toggle, stream_label, GroupRow, COLLAPSED_ROWS,
    GROUP_TABLE_COLUMNS,
};
use crate::app::data_plane::cloudwatch_logs::{
    BrowserPhase, LogBrowserController, LogEvent, LogGroup,
};
use chrono::Utc;
use eframe::egui;
use egui::text::LayoutJob;
use egui::{Color32, Context, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use std::collections::HashSet;

/// Requests the window cannot fulfil on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogsWindowAction {
    /// Authenticate again from the current configuration
    Connect,
}

pub struct CloudWatchLogsWindow {
    pub open: bool,
    group_search: String,
    event_search: String,
    expanded_events: HashSet<usize>,
    expanded_stream: Option<String>,
}

impl Default for CloudWatchLogsWindow {
    fn default() -> Self {
        Self {
            open: true,
            group_search: String::new(),
            event_search: String::new(),
            expanded_events: HashSet::new(),
            expanded_stream: None,
        }
    }
}

impl CloudWatchLogsWindow {
    pub fn show(
        &mut self,
        ctx: &Context,
        controller: &mut LogBrowserController,
    ) -> Option<LogsWindowAction> {
        if !self.open {
            return None;
        }

        let mut action = None;
        let mut is_open = self.open;

        let screen_rect = ctx.screen_rect();
        let default_width = 1000.0_f32.min(screen_rect.width() * 0.9);
        let default_height = 650.0_f32.min(screen_rect.height() * 0.9);

        egui::Window::new(self.window_title(controller))
            .id(egui::Id::new("cloudwatch_logs_window"))
            .open(&mut is_open)
            .default_size([default_width, default_height])
            .resizable(true)
            .collapsible(true)
            .show(ctx, |ui| {
                action = self.ui_content(ui, controller);
            });

        self.open = is_open;
        action
    }

    pub fn window_title(&self, controller: &LogBrowserController) -> String {
        match controller
            .selection()
            .selected_group
            .as_ref()
            .and_then(|g| g.name.as_deref())
        {
            Some(name) => format!("CloudWatch Logs: {}", name),
            None => "CloudWatch Logs".to_string(),
        }
    }

    pub fn ui_content(
        &mut self,
        ui: &mut Ui,
        controller: &mut LogBrowserController,
    ) -> Option<LogsWindowAction> {
        match controller.phase() {
            BrowserPhase::NoSession => self.render_disconnected(ui),
            BrowserPhase::Connected | BrowserPhase::GroupsLoading | BrowserPhase::GroupsLoaded => {
                controller.ensure_groups_loaded();
                self.render_group_table(ui, controller)
            }
            BrowserPhase::GroupSelected { .. } | BrowserPhase::StreamSelected(_) => {
                self.render_group_view(ui, controller);
                None
            }
        }
    }

    fn render_disconnected(&mut self, ui: &mut Ui) -> Option<LogsWindowAction> {
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("Not connected").heading());
            ui.label("Set credentials in config.toml or the AWS_* environment variables.");
            ui.add_space(8.0);
            if ui.button("Connect").clicked() {
                action = Some(LogsWindowAction::Connect);
            }
        });
        action
    }

    // ---------------------------------------------------------------------
    // Group table
    // ---------------------------------------------------------------------

    fn render_group_table(
        &mut self,
        ui: &mut Ui,
        controller: &mut LogBrowserController,
    ) -> Option<LogsWindowAction> {
        let mut action = None;

        if let Some(session) = controller.session() {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Region:").strong());
                ui.label(session.region());
                if let Some(endpoint) = session.endpoint_url() {
                    ui.separator();
                    ui.label(RichText::new("Endpoint:").strong());
                    ui.label(endpoint);
                }
            });
        }

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.group_search);
            if ui.button("Refresh").clicked() {
                controller.refresh_groups();
            }
            if ui.button("Reconnect").clicked() {
                action = Some(LogsWindowAction::Connect);
            }
            if controller.groups_loading() {
                ui.spinner();
            }
        });

        ui.separator();

        let visible: Vec<&LogGroup> = controller
            .groups()
            .iter()
            .filter(|group| group_matches(group, &self.group_search))
            .collect();

        if visible.is_empty() {
            if !controller.groups_loading() {
                let text = if self.group_search.is_empty() {
                    "No log groups found"
                } else {
                    "No log groups match your search"
                };
                ui.label(RichText::new(text).italics());
            }
            return action;
        }

        ui.label(format!(
            "{} of {} log groups",
            visible.len(),
            controller.groups().len()
        ));

        let mut opened: Option<LogGroup> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::initial(380.0).at_least(120.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in GROUP_TABLE_COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, visible.len(), |mut row| {
                    let group = visible[row.index()];
                    let display = GroupRow::from(group);
                    row.col(|ui| {
                        let clickable = group.name.is_some();
                        let response = ui.add_enabled(
                            clickable,
                            egui::Label::new(RichText::new(&display.name).monospace())
                                .sense(egui::Sense::click()),
                        );
                        if response.clicked() {
                            opened = Some(group.clone());
                        }
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&display.arn).monospace().weak());
                    });
                });
            });

        if let Some(group) = opened {
            self.event_search.clear();
            controller.open_group(group);
        }

        action
    }

    // ---------------------------------------------------------------------
    // Group view
    // ---------------------------------------------------------------------

    fn render_group_view(&mut self, ui: &mut Ui, controller: &mut LogBrowserController) {
        ui.horizontal(|ui| {
            if ui.button("⬅ Log Groups").clicked() {
                controller.close_group();
            }
            if ui.button("Refresh").clicked() {
                controller.refresh_group();
            }
        });

        ui.horizontal_wrapped(|ui| {
            for (label, value) in detail_lines(controller.group_detail()) {
                ui.label(RichText::new(format!("{}:", label)).strong());
                ui.label(RichText::new(value).monospace());
                ui.add_space(12.0);
            }
        });

        ui.separator();

        // Selection can end the group view (back button) within this frame
        if controller.selection().selected_group.is_none() {
            return;
        }

        egui::SidePanel::left("log_streams_panel")
            .resizable(true)
            .default_width(300.0)
            .show_inside(ui, |ui| {
                self.render_stream_list(ui, controller);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            self.render_events(ui, controller);
        });
    }

    fn render_stream_list(&mut self, ui: &mut Ui, controller: &mut LogBrowserController) {
        ui.horizontal(|ui| {
            ui.heading("Log Streams");
            if controller.streams_loading() {
                ui.spinner();
            }
        });

        let now = Utc::now();
        let selected = controller.selection().selected_stream_name.clone();
        let mut clicked: Option<String> = None;

        egui::ScrollArea::vertical()
            .id_salt("log_streams_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for stream in controller.streams() {
                    let label = stream_label(stream);
                    let is_selected = stream.name.is_some() && stream.name == selected;

                    ui.vertical(|ui| {
                        let response = ui
                            .add_enabled_ui(stream.name.is_some(), |ui| {
                                ui.selectable_label(is_selected, label)
                            })
                            .inner;
                        if response.clicked() {
                            clicked = stream.name.clone();
                        }
                        if let Some(last_event) = stream.last_event_timestamp {
                            ui.label(RichText::new(format_relative(last_event, now)).small().weak());
                        }
                    });
                    ui.add_space(4.0);
                }
            });

        if let Some(stream_name) = clicked {
            controller.select_stream(stream_name);
        }
    }

    fn render_events(&mut self, ui: &mut Ui, controller: &LogBrowserController) {
        let selection = controller.selection();

        let Some(stream_name) = selection.selected_stream_name.as_deref() else {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(RichText::new("Select a Log Stream").heading().weak());
                ui.label(RichText::new("Choose a log stream from the list to view its events").weak());
            });
            return;
        };

        if self.expanded_stream.as_deref() != Some(stream_name) {
            self.expanded_events.clear();
            self.expanded_stream = Some(stream_name.to_string());
        }

        ui.label(RichText::new(stream_name).heading());
        if selection.is_loading {
            ui.add(egui::ProgressBar::new(0.0).animate(true).desired_height(4.0));
        }
        if let Some(error) = &selection.last_error {
            ui.colored_label(Color32::RED, RichText::new(error).small());
        }

        ui.horizontal(|ui| {
            ui.label("Filter (fuzzy):");
            ui.text_edit_singleline(&mut self.event_search);
        });

        ui.separator();

        if selection.loaded_events.is_empty() && !selection.is_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(RichText::new("No log events found").weak());
            });
            return;
        }

        let filtered = filter_events(&selection.loaded_events, &self.event_search);

        egui::ScrollArea::vertical()
            .id_salt("log_events_scroll")
            .max_height((ui.available_height() - 24.0).max(0.0))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for &(index, event) in &filtered {
                    self.render_event(ui, index, event);
                    ui.add_space(6.0);
                }
            });

        ui.label(format!(
            "Showing {} of {} events (first {} from head)",
            filtered.len(),
            selection.loaded_events.len(),
            controller.event_limit()
        ));
    }

    /// `index` is the event's position in the loaded events, not in the filtered list
    fn render_event(&mut self, ui: &mut Ui, index: usize, event: &LogEvent) {
        let expanded = self.expanded_events.contains(&index);
        let message = event.message.as_deref().map(format_message);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal_top(|ui| {
                if let Some(timestamp) = event.timestamp {
                    ui.label(RichText::new(format_full_timestamp(timestamp)).monospace().weak());
                }

                if message.as_deref().is_some_and(needs_expand_toggle) {
                    let icon = if expanded { "⏶" } else { "⏷" };
                    if ui.small_button(icon).clicked() {
                        self.toggle_expanded(index);
                    }
                }
            });

            if let Some(message) = message {
                let job = message_layout(message, expanded, ui.style());
                ui.add(egui::Label::new(job).selectable(true));
            }
        });
    }

    fn toggle_expanded(&mut self, index: usize) {
        if !self.expanded_events.remove(&index) {
            self.expanded_events.insert(index);
        }
    }
}

/// Monospace layout of an event message; collapsed messages stop after [`COLLAPSED_ROWS`]
/// wrapped rows with an ellipsis.
fn message_layout(message: String, expanded: bool, style: &egui::Style) -> LayoutJob {
    let mut job = std::sync::Arc::unwrap_or_clone(
        egui::WidgetText::from(RichText::new(message).monospace()).into_layout_job(
            style,
            egui::FontSelection::Default,
            egui::Align::LEFT,
        ),
    );
    if !expanded {
        job.wrap.max_rows = COLLAPSED_ROWS;
        job.wrap.break_anywhere = true;
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let window = CloudWatchLogsWindow::default();
        assert!(window.open);
        assert!(window.group_search.is_empty());
        assert!(window.expanded_events.is_empty());
    }

    #[test]
    fn test_window_title_follows_selection() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let controller = LogBrowserController::new(runtime.handle().clone(), 100);
        let window = CloudWatchLogsWindow::default();
        assert_eq!(window.window_title(&controller), "CloudWatch Logs");
    }

    #[test]
    fn test_collapsed_message_is_row_limited() {
        let style = egui::Style::default();
        let long_line = "x".repeat(2_000);

        let collapsed = message_layout(long_line.clone(), false, &style);
        assert_eq!(collapsed.wrap.max_rows, COLLAPSED_ROWS);

        let expanded = message_layout(long_line, true, &style);
        assert_eq!(expanded.wrap.max_rows, usize::MAX);
    }

    #[test]
    fn test_expanded_state_follows_loaded_position() {
        let mut window = CloudWatchLogsWindow::default();
        let events = vec![
            LogEvent::new(1, "INFO boot"),
            LogEvent::new(2, "ERROR disk full"),
            LogEvent::new(3, "INFO ready"),
        ];

        // Expand the error while filtered down to it
        let (index, _) = filter_events(&events, "ERROR")[0];
        window.toggle_expanded(index);

        // Clearing the filter leaves the same event expanded
        let expanded: Vec<i64> = filter_events(&events, "")
            .into_iter()
            .filter(|(index, _)| window.expanded_events.contains(index))
            .filter_map(|(_, event)| event.timestamp)
            .collect();
        assert_eq!(expanded, vec![2]);

        window.toggle_expanded(index);
        assert!(window.expanded_events.is_empty());
    }
}
