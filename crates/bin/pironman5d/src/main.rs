//! # pironman5d: pironman5 case daemon
//!
//! Composition root that wires all adapters together and runs the daemon.
//!
//! ## Responsibilities
//! - Load settings (TOML file, env vars) and install the log subscriber
//! - Dispatch the command line: run the daemon, or patch the config file
//!   offline and exit
//! - Load the config document through the JSON file store
//! - Construct the automation controller, the optional dashboard and the
//!   OLED display, each with its own tracing span
//! - Hand them to [`Pironman`], start it, and stop it on SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod cli;
mod logging;
mod settings;

use std::sync::Arc;

use clap::Parser;
use pironman_adapter_storage_json::JsonFileStore;
use pironman_adapter_virtual::{VirtualAutomation, VirtualOled};
use pironman_app::services::config_service::ConfigService;
use pironman_app::services::pironman::{Pironman, VERSION};
use pironman_domain::config::ConfigDocument;
use pironman_domain::variant::{PIRONMAN5, Variant};

use crate::cli::{Cli, Command};
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let log_level = logging::init(&settings.logging.filter)?;

    if let Some(Command::Patch { json }) = cli.command {
        let merged = cli::patch(&settings.config.path, &json)?;
        tracing::info!(path = %settings.config.path.display(), "config patched");
        println!("{}", serde_json::to_string_pretty(&merged)?);
        return Ok(());
    }

    tracing::info!(version = VERSION, "pironman5d starting");

    let variant = &PIRONMAN5;
    let store = JsonFileStore::new(settings.config.path.clone());
    let config = Arc::new(ConfigService::load(store, variant.system_defaults()));

    let automation = VirtualAutomation::new(
        config.system(),
        variant.peripherals,
        tracing::info_span!("automation"),
    )
    .with_thermal_zone(settings.automation.thermal_zone.clone());
    let dashboard = build_dashboard(&settings, variant, config.document());
    let oled = VirtualOled::new(settings.oled.ready, tracing::info_span!("oled"));

    let mut pironman =
        Pironman::new(variant, config, automation, dashboard, oled).with_log_control(log_level);
    if let Some(path) = settings.splash_gif() {
        pironman = pironman.with_splash(path);
    }
    if let Some(level) = settings.logging.debug_level {
        pironman.set_debug_level(level);
    }

    pironman.start().await;
    shutdown_signal().await;
    tracing::info!("shutting down");
    pironman.stop().await;

    Ok(())
}

#[cfg(feature = "dashboard")]
fn build_dashboard(
    settings: &Settings,
    variant: &Variant,
    config: ConfigDocument,
) -> Option<pironman_adapter_http_axum::HttpDashboard> {
    use pironman_adapter_http_axum::{DashboardSettings, HttpDashboard};

    if !settings.dashboard.enabled {
        return None;
    }
    let dashboard_settings = DashboardSettings {
        device: variant.device_info(VERSION),
        database: variant.id.to_string(),
        spc_enabled: variant.spc_enabled(),
        config,
        bind_addr: settings.bind_addr(),
    };
    Some(HttpDashboard::new(
        dashboard_settings,
        tracing::info_span!("dashboard"),
    ))
}

#[cfg(not(feature = "dashboard"))]
fn build_dashboard(
    _settings: &Settings,
    _variant: &Variant,
    _config: ConfigDocument,
) -> Option<pironman_app::ports::NoDashboard> {
    None
}

/// Resolve on SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
