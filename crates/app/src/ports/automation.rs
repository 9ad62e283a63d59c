//! Automation port: the controller driving fans, LEDs and other hardware.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};

use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;
use pironman_domain::status::Status;

/// Receives every status snapshot the automation controller produces.
///
/// Called from the controller's own task, after the state change it reports
/// has completed. Implementations must not block.
pub trait StatusListener: Send + Sync {
    fn on_status_changed(&self, status: &Status);
}

/// A hardware automation controller.
///
/// Constructed by the composition root with the `system` section of the
/// config document and the variant's peripheral list. Methods take `&self`
/// because the controller is shared with the config listener.
pub trait Automation: Send + Sync {
    /// Version of the controller implementation, for diagnostics.
    fn version(&self) -> &str;

    /// Start the control loops. Returns once they are running.
    fn start(&self) -> impl Future<Output = Result<(), PironmanError>> + Send;

    /// Stop the control loops. Stopping a stopped controller is a no-op.
    fn stop(&self) -> impl Future<Output = Result<(), PironmanError>> + Send;

    fn set_debug_level(&self, level: LogLevel);

    /// Apply a (partial) `system` section to the live configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller rejects the new settings.
    fn update_config(&self, system: &Map<String, Value>) -> Result<(), PironmanError>;

    /// Register the listener notified on every state change, replacing any
    /// previous one.
    fn set_on_state_changed(&self, listener: Arc<dyn StatusListener>);
}

impl<T: Automation> Automation for Arc<T> {
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

    fn update_config(&self, system: &Map<String, Value>) -> Result<(), PironmanError> {
        (**self).update_config(system)
    }

    fn set_on_state_changed(&self, listener: Arc<dyn StatusListener>) {
        (**self).set_on_state_changed(listener);
    }
}
