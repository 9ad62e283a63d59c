//! Log level port: runtime control of the daemon's own verbosity.

use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;

/// Changes the level of the installed log subscriber.
pub trait LogLevelControl: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the subscriber can no longer be reconfigured.
    fn set_level(&self, level: LogLevel) -> Result<(), PironmanError>;
}
