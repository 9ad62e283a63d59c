//! Dashboard port: the optional web UI showing status and editing config.
//!
//! The dashboard is optional. Callers hold an `Option<D>`; builds that ship
//! without any dashboard use [`NoDashboard`], a type with no values, so the
//! `Some` branch is statically unreachable.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use pironman_domain::config::ConfigDocument;
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::status::Status;

/// Receives configuration edits made through the dashboard.
pub trait ConfigListener: Send + Sync {
    /// Apply `patch` and return the resulting merged document.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch could not be applied or persisted.
    fn on_config_changed(&self, patch: &Map<String, Value>)
    -> Result<ConfigDocument, PironmanError>;
}

/// A web dashboard.
///
/// Constructed by the composition root with the device descriptor, the
/// database identifier, the `spc` feature flag and the full config document.
pub trait Dashboard: Send + Sync {
    /// Version of the dashboard implementation, for diagnostics.
    fn version(&self) -> &str;

    fn start(&self) -> impl Future<Output = Result<(), PironmanError>> + Send;

    fn stop(&self) -> impl Future<Output = Result<(), PironmanError>> + Send;

    fn set_debug_level(&self, level: LogLevel);

    /// Publish a new automation status snapshot.
    fn update_status(&self, status: &Status);

    /// Replace the dashboard's view of the config document after an edit
    /// that did not come through the dashboard itself.
    fn update_config(&self, config: &ConfigDocument);

    /// Register the listener notified on every user config edit, replacing
    /// any previous one.
    fn set_on_config_changed(&self, listener: Arc<dyn ConfigListener>);
}

impl<T: Dashboard> Dashboard for Arc<T> {
    fn version(&self) -> &str {
        (**self).version()
    }

    fn start(&self) -> impl Future<Output = Result<(), PironmanError>> + Send {
        (**self).start()
    }

    fn stop(&self) -> impl Future<Output = Result<(), PironmanError>> + Send {
        (**self).stop()
    }

    fn set_debug_level(&self, level: LogLevel) {
        (**self).set_debug_level(level);
    }

    fn update_status(&self, status: &Status) {
        (**self).update_status(status);
    }

    fn update_config(&self, config: &ConfigDocument) {
        (**self).update_config(config);
    }

    fn set_on_config_changed(&self, listener: Arc<dyn ConfigListener>) {
        (**self).set_on_config_changed(listener);
    }
}

/// Stand-in for a dashboard that is not part of this build.
#[derive(Debug, Clone, Copy)]
pub enum NoDashboard {}

impl Dashboard for NoDashboard {
    fn version(&self) -> &str {
        match *self {}
    }

    async fn start(&self) -> Result<(), PironmanError> {
        match *self {}
    }

    async fn stop(&self) -> Result<(), PironmanError> {
        match *self {}
    }

    fn set_debug_level(&self, _level: LogLevel) {
        match *self {}
    }

    fn update_status(&self, _status: &Status) {
        match *self {}
    }

    fn update_config(&self, _config: &ConfigDocument) {
        match *self {}
    }

    fn set_on_config_changed(&self, _listener: Arc<dyn ConfigListener>) {
        match *self {}
    }
}
