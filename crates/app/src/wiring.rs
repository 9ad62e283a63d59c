//! Listener implementations connecting automation and dashboard.
//!
//! The two collaborators never reference each other directly:
//!
//! ```text
//! automation ──StatusForwarder (Weak)──▶ dashboard
//! dashboard  ──ConfigSync (Arc)────────▶ automation + ConfigService
//! ```
//!
//! Only one direction holds a strong reference, so dropping the orchestrator
//! frees both components.

use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

use pironman_domain::config::{ConfigDocument, SYSTEM_KEY};
use pironman_domain::error::{PironmanError, ValidationError};
use pironman_domain::status::Status;

use crate::ports::{Automation, ConfigListener, ConfigStore, Dashboard, StatusListener};
use crate::services::config_service::ConfigService;

/// Forwards automation status snapshots to the dashboard.
pub struct StatusForwarder<D> {
    dashboard: Weak<D>,
}

impl<D> StatusForwarder<D> {
    #[must_use]
    pub fn new(dashboard: Weak<D>) -> Self {
        Self { dashboard }
    }
}

impl<D: Dashboard> StatusListener for StatusForwarder<D> {
    fn on_status_changed(&self, status: &Status) {
        match self.dashboard.upgrade() {
            Some(dashboard) => dashboard.update_status(status),
            None => tracing::trace!("dashboard dropped, status not forwarded"),
        }
    }
}

/// Applies dashboard config edits to the automation controller and the
/// persisted document.
pub struct ConfigSync<A, S> {
    automation: Arc<A>,
    config: Arc<ConfigService<S>>,
}

impl<A, S> ConfigSync<A, S> {
    #[must_use]
    pub fn new(automation: Arc<A>, config: Arc<ConfigService<S>>) -> Self {
        Self { automation, config }
    }
}

impl<A: Automation, S: ConfigStore> ConfigSync<A, S> {
    /// Push the patch's `system` section to automation, then merge and
    /// persist the whole patch.
    ///
    /// Patches without a `system` section only touch the document. When
    /// automation rejects the new settings nothing is persisted. When the
    /// document cannot be merged or saved, automation gets the previous
    /// `system` settings back; keys the patch introduced stay with it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingSection`] when `system` is present
    /// but not an object, the automation error if it rejects the settings,
    /// or a storage error from the config service.
    pub fn apply(&self, patch: &Map<String, Value>) -> Result<ConfigDocument, PironmanError> {
        let Some(system) = patch.get(SYSTEM_KEY) else {
            return self.config.apply(patch);
        };
        let system = system
            .as_object()
            .ok_or(ValidationError::MissingSection(SYSTEM_KEY))?;

        let previous = self.config.system();
        self.automation.update_config(system)?;
        self.config.apply(patch).inspect_err(|_| {
            if let Err(err) = self.automation.update_config(&previous) {
                tracing::error!(error = %err, "failed to restore automation settings");
            }
        })
    }
}

impl<A: Automation, S: ConfigStore> ConfigListener for ConfigSync<A, S> {
    fn on_config_changed(
        &self,
        patch: &Map<String, Value>,
    ) -> Result<ConfigDocument, PironmanError> {
        self.apply(patch).inspect_err(|err| {
            tracing::error!(error = %err, "failed to apply config change");
        })
    }
}
