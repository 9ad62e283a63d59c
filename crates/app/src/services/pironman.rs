//! Pironman service: wires the collaborators together and drives their
//! lifecycle.
//!
//! Construction registers the two listeners (status → dashboard, config
//! edits → automation + store). [`Pironman::start`] and [`Pironman::stop`]
//! delegate to the collaborators in a fixed order and never fail: every
//! collaborator error is logged, so a broken dashboard or display never
//! takes automation down with it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use pironman_domain::config::ConfigDocument;
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::variant::Variant;

use crate::ports::{Automation, ConfigStore, Dashboard, LogLevelControl, Oled};
use crate::services::config_service::ConfigService;
use crate::wiring::{ConfigSync, StatusForwarder};

/// Version shared by every crate of the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The integration layer of the daemon.
pub struct Pironman<A, D, O, S> {
    config: Arc<ConfigService<S>>,
    automation: Arc<A>,
    dashboard: Option<Arc<D>>,
    oled: O,
    sync: Arc<ConfigSync<A, S>>,
    log_control: Option<Box<dyn LogLevelControl>>,
    splash: Option<PathBuf>,
}

impl<A, D, O, S> Pironman<A, D, O, S>
where
    A: Automation + 'static,
    D: Dashboard + 'static,
    O: Oled,
    S: ConfigStore + 'static,
{
    /// Wire `automation` and the optional `dashboard` together.
    ///
    /// When a dashboard is present, automation status changes are forwarded
    /// to it and its config edits are applied through [`ConfigSync`]. When it
    /// is absent a warning is logged and every dashboard call is skipped.
    pub fn new(
        variant: &Variant,
        config: Arc<ConfigService<S>>,
        automation: A,
        dashboard: Option<D>,
        oled: O,
    ) -> Self {
        let automation = Arc::new(automation);
        let dashboard = dashboard.map(Arc::new);
        let sync = Arc::new(ConfigSync::new(Arc::clone(&automation), Arc::clone(&config)));

        tracing::debug!(version = VERSION, "pironman5");
        tracing::debug!(
            variant = variant.name,
            product_version = variant.product_version,
            "variant"
        );
        tracing::debug!(version = automation.version(), "automation");

        match &dashboard {
            Some(dashboard) => {
                tracing::debug!(version = dashboard.version(), "dashboard");
                automation.set_on_state_changed(Arc::new(StatusForwarder::new(Arc::downgrade(
                    dashboard,
                ))));
                dashboard.set_on_config_changed(Arc::clone(&sync) as _);
            }
            None => tracing::warn!("dashboard not available, skipping"),
        }

        Self {
            config,
            automation,
            dashboard,
            oled,
            sync,
            log_control: None,
            splash: None,
        }
    }

    /// Route [`set_debug_level`](Self::set_debug_level) to the daemon's own
    /// log subscriber as well.
    #[must_use]
    pub fn with_log_control(mut self, control: impl LogLevelControl + 'static) -> Self {
        self.log_control = Some(Box::new(control));
        self
    }

    /// GIF shown on the OLED once startup completes.
    #[must_use]
    pub fn with_splash(mut self, path: impl Into<PathBuf>) -> Self {
        self.splash = Some(path.into());
        self
    }

    /// Whether a dashboard was wired in.
    #[must_use]
    pub fn has_dashboard(&self) -> bool {
        self.dashboard.is_some()
    }

    /// Snapshot of the merged config document.
    #[must_use]
    pub fn config(&self) -> ConfigDocument {
        self.config.document()
    }

    /// Change the verbosity of the daemon and of every collaborator.
    #[tracing::instrument(skip(self))]
    pub fn set_debug_level(&self, level: LogLevel) {
        if let Some(control) = &self.log_control {
            if let Err(err) = control.set_level(level) {
                tracing::error!(error = %err, "failed to change log level");
            }
        }
        self.automation.set_debug_level(level);
        if let Some(dashboard) = &self.dashboard {
            dashboard.set_debug_level(level);
        }
    }

    /// Apply a config patch exactly as a dashboard edit would, then hand the
    /// merged document to the dashboard so its view stays current.
    ///
    /// # Errors
    ///
    /// See [`ConfigSync::apply`]. The dashboard is left untouched on error.
    #[tracing::instrument(skip_all)]
    pub fn update_config(&self, patch: &Map<String, Value>) -> Result<ConfigDocument, PironmanError> {
        let merged = self.sync.apply(patch)?;
        if let Some(dashboard) = &self.dashboard {
            dashboard.update_config(&merged);
        }
        Ok(merged)
    }

    /// Start automation, then the dashboard, then show the splash.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) {
        match self.automation.start().await {
            Ok(()) => tracing::info!("automation started"),
            Err(err) => tracing::error!(error = %err, "failed to start automation"),
        }

        if let Some(dashboard) = &self.dashboard {
            match dashboard.start().await {
                Ok(()) => tracing::info!("dashboard started"),
                Err(err) => tracing::error!(error = %err, "failed to start dashboard"),
            }
        }

        if let Some(splash) = &self.splash {
            self.show_splash(splash);
        }
    }

    /// Stop automation, then the dashboard.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) {
        if let Err(err) = self.automation.stop().await {
            tracing::error!(error = %err, "failed to stop automation");
        }

        if let Some(dashboard) = &self.dashboard {
            if let Err(err) = dashboard.stop().await {
                tracing::error!(error = %err, "failed to stop dashboard");
            }
        }
        tracing::info!("stopped");
    }

    fn show_splash(&self, path: &Path) {
        if !self.oled.is_ready() {
            tracing::error!("OLED is not ready, cannot display GIF");
            return;
        }

        tracing::info!(path = %path.display(), "displaying GIF");
        match self.oled.display_gif(path) {
            Ok(()) => tracing::info!("GIF displayed"),
            Err(err) => tracing::error!(error = %err, "failed to display GIF"),
        }
    }
}
