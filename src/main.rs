#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use tracing_subscriber::prelude::*;

use anyhow::Context;
use cloudviz::app::config::AppConfig;

fn init_logging() {
    // To enable: TOKIO_CONSOLE=1 RUSTFLAGS="--cfg tokio_unstable" cargo run
    let use_tokio_console = std::env::var("TOKIO_CONSOLE")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    if use_tokio_console {
        console_subscriber::init();
        eprintln!("tokio-console profiling enabled - connect with: tokio-console");
        eprintln!("NOTE: File logging disabled when using tokio-console");
        return;
    }

    let Some(proj_dirs) = directories::ProjectDirs::from("com", "", "cloudviz") else {
        eprintln!("No home directory found, logging disabled");
        return;
    };

    let log_dir = proj_dirs.data_dir().join("logs");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("cloudviz.log");

    let file = match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&log_path, perms) {
                eprintln!("[SECURITY] Failed to set log file permissions: {}", e);
            }
        }
    }

    // RUST_LOG replaces the default directives entirely
    let requested = std::env::var("RUST_LOG").ok();
    let (filter, base_filter) = cloudviz::resolve_log_filter(requested.as_deref());

    let (filter, reload_handle) = tracing_subscriber::reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(move || file.try_clone().expect("Failed to clone file handle"))
            .with_ansi(false),
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    // Bridge log crate events (eframe, egui, wgpu) to tracing; must follow the subscriber
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize log-to-tracing bridge: {}", e);
    }

    cloudviz::set_tracing_reload_handle(reload_handle, base_filter);

    tracing::info!("Logging initialized to: {:?}", log_path);
}

fn setup_panic_handler() {
    // Writes panic info to crash.log even if logging isn't initialized yet
    std::panic::set_hook(Box::new(|panic_info| {
        let crash_msg = format!(
            "Cloud Visualizer crashed!\n\
             Panic occurred at: {}\n\
             Details: {}\n\
             Backtrace:\n{:?}\n",
            panic_info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_else(|| "unknown location".to_string()),
            panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.payload().downcast_ref::<String>().map(|s| s.as_str()))
                .unwrap_or("unknown panic"),
            std::backtrace::Backtrace::force_capture()
        );

        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "", "cloudviz") {
            let log_dir = proj_dirs.data_dir().join("logs");
            let _ = std::fs::create_dir_all(&log_dir);
            let crash_log_path = log_dir.join("crash.log");

            if let Ok(mut file) = std::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&crash_log_path)
            {
                use std::io::Write;
                let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let _ = writeln!(file, "\n=== CRASH at {} ===\n{}", timestamp, crash_msg);
            }

            eprintln!("\n{}", crash_msg);
            eprintln!("Crash log written to: {:?}", crash_log_path);
        } else {
            eprintln!("\n{}", crash_msg);
        }
    }));
}

fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}, continuing with defaults and environment", e);
            let mut config = AppConfig::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config.normalized()
        }
    }
}

fn main() -> anyhow::Result<()> {
    setup_panic_handler();
    init_logging();

    tracing::info!(
        "cloudviz {} starting ({}@{})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_BRANCH"),
        env!("GIT_COMMIT")
    );

    let config = load_config();
    tracing::info!("Configuration: {:?}", config);

    // Lives for the whole program; every CloudWatch Logs request is a task on it
    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cloud Visualizer",
        native_options,
        Box::new(move |cc| Ok(Box::new(cloudviz::DashApp::new(cc, handle, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    drop(runtime);
    Ok(())
}
