use crate::app::dashui::app::ThemeChoice;
use crate::app::data_plane::cloudwatch_logs::ClientSession;
use eframe::egui;
use egui::{Color32, RichText};

#[derive(Debug, PartialEq)]
pub enum MenuAction {
    None,
    ThemeChanged,
    SdkLoggingChanged,
    Connect,
    ShowLogs,
    Quit,
}

pub fn build_menu(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    theme: &mut ThemeChoice,
    sdk_logging_enabled: &mut bool,
    session: Option<&ClientSession>,
) -> MenuAction {
    let mut menu_action = MenuAction::None;
    let original_theme = *theme;
    let original_sdk_logging = *sdk_logging_enabled;

    ui.menu_button("Cloud Visualizer", |ui| {
        let connect_label = if session.is_some() { "Reconnect" } else { "Connect" };
        if ui.button(connect_label).clicked() {
            menu_action = MenuAction::Connect;
        }
        if ui.button("CloudWatch Logs").clicked() {
            menu_action = MenuAction::ShowLogs;
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            menu_action = MenuAction::Quit;
        }
    });

    ui.menu_button(RichText::new("🎨").size(18.0), |ui| {
        for choice in ThemeChoice::ALL {
            if ui.button(choice.to_string()).clicked() {
                choice.apply(ctx);
                *theme = choice;
            }
        }

        ui.separator();

        let logging_response = ui.checkbox(sdk_logging_enabled, "SDK Wire Logging");
        if logging_response.hovered() {
            logging_response.on_hover_text(
                "Log every CloudWatch Logs request and response at trace level",
            );
        }
    });

    ui.add_space(16.0);
    show_connection_status(ui, session);

    if menu_action != MenuAction::None {
        menu_action
    } else if original_theme != *theme {
        MenuAction::ThemeChanged
    } else if original_sdk_logging != *sdk_logging_enabled {
        MenuAction::SdkLoggingChanged
    } else {
        MenuAction::None
    }
}

/// Displays the connection status indicator
fn show_connection_status(ui: &mut egui::Ui, session: Option<&ClientSession>) {
    match session {
        Some(session) => {
            ui.label(RichText::new("●").color(Color32::from_rgb(140, 200, 170)));
            ui.label(RichText::new(session.region()).color(Color32::from_rgb(100, 170, 255)));
            if let Some(endpoint) = session.endpoint_url() {
                ui.separator();
                ui.label(RichText::new(endpoint).color(Color32::from_rgb(255, 190, 70)));
            }
        }
        None => {
            ui.label(RichText::new("●").color(Color32::from_rgb(220, 80, 80)));
            ui.label("Not connected");
        }
    }
}
