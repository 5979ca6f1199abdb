use super::cloudwatch_logs_window::{CloudWatchLogsWindow, LogsWindowAction};
use super::menu::{self, MenuAction};
use crate::app::config::AppConfig;
use crate::app::data_plane::cloudwatch_logs::{authenticate, LogBrowserController};
use eframe::egui;
use tokio::runtime::Handle;

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ThemeChoice {
    #[default]
    Latte,
    Frappe,
    Macchiato,
    Mocha,
}

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 4] = [
        ThemeChoice::Latte,
        ThemeChoice::Frappe,
        ThemeChoice::Macchiato,
        ThemeChoice::Mocha,
    ];

    pub fn apply(self, ctx: &egui::Context) {
        match self {
            ThemeChoice::Latte => catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE),
            ThemeChoice::Frappe => catppuccin_egui::set_theme(ctx, catppuccin_egui::FRAPPE),
            ThemeChoice::Macchiato => catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO),
            ThemeChoice::Mocha => catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA),
        }

        let mut style = (*ctx.style()).clone();
        style.visuals.window_corner_radius = egui::CornerRadius::same(2);
        ctx.set_style(style);
    }
}

impl std::fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeChoice::Latte => write!(f, "Latte"),
            ThemeChoice::Frappe => write!(f, "Frappe"),
            ThemeChoice::Macchiato => write!(f, "Macchiato"),
            ThemeChoice::Mocha => write!(f, "Mocha"),
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DashApp {
    pub theme: ThemeChoice,
    pub logs_window_open: bool,

    #[serde(skip)]
    pub config: AppConfig,
    #[serde(skip)]
    pub logs_window: CloudWatchLogsWindow,
    #[serde(skip)]
    pub controller: Option<LogBrowserController>,
    #[serde(skip)]
    pub sdk_logging_enabled: bool,
}

impl Default for DashApp {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            logs_window_open: true,
            config: AppConfig::default(),
            logs_window: CloudWatchLogsWindow::default(),
            controller: None,
            sdk_logging_enabled: false,
        }
    }
}

impl DashApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Handle, config: AppConfig) -> Self {
        let mut app: Self = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        app.theme.apply(&cc.egui_ctx);

        let mut controller = LogBrowserController::new(runtime, config.event_limit);
        let ctx = cc.egui_ctx.clone();
        controller.set_repaint_callback(move || ctx.request_repaint());

        app.logs_window.open = app.logs_window_open;
        app.controller = Some(controller);
        app.config = config;

        if app.config.auto_connect {
            app.connect();
        }

        app
    }

    /// Authenticate from the current configuration and hand the session to the controller.
    ///
    /// A failed authentication is logged and leaves any existing session in place.
    pub fn connect(&mut self) {
        let Some(controller) = self.controller.as_mut() else {
            log_warn!("Connect requested before the log browser was initialized");
            return;
        };

        let credentials = self.config.credentials();
        match authenticate(
            &credentials,
            &self.config.region,
            self.config.endpoint_url.as_deref(),
            self.config.verbose_sdk_logging,
        ) {
            Ok(session) => {
                log_info!(
                    "Connected to CloudWatch Logs in {} as {}",
                    session.region(),
                    session.access_key_id()
                );
                if self.config.verbose_sdk_logging {
                    self.sdk_logging_enabled = true;
                }
                controller.set_session(Some(session));
                controller.ensure_groups_loaded();
            }
            Err(e) => {
                log_error!("Authentication failed: {}", e);
            }
        }
    }

    fn handle_menu_action(&mut self, ctx: &egui::Context, action: MenuAction) {
        match action {
            MenuAction::None | MenuAction::ThemeChanged => {}
            MenuAction::SdkLoggingChanged => {
                if !crate::set_sdk_wire_logging(self.sdk_logging_enabled) {
                    log_warn!("SDK wire logging unavailable: no tracing reload handle installed");
                }
            }
            MenuAction::Connect => self.connect(),
            MenuAction::ShowLogs => self.logs_window.open = true,
            MenuAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

impl eframe::App for DashApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.logs_window_open = self.logs_window.open;
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(controller) = self.controller.as_mut() {
            controller.poll();
        }

        let mut menu_action = MenuAction::None;
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let session = self.controller.as_ref().and_then(|c| c.session());
                menu_action = menu::build_menu(
                    ui,
                    ctx,
                    &mut self.theme,
                    &mut self.sdk_logging_enabled,
                    session,
                );
            });
        });
        self.handle_menu_action(ctx, menu_action);

        egui::CentralPanel::default().show(ctx, |_ui| {});

        let window_action = match self.controller.as_mut() {
            Some(controller) => self.logs_window.show(ctx, controller),
            None => None,
        };
        if window_action == Some(LogsWindowAction::Connect) {
            self.connect();
        }
    }
}
