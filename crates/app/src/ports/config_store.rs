//! Config store port: persistence of the configuration document.

use serde_json::Value;

use pironman_domain::config::ConfigDocument;
use pironman_domain::error::PironmanError;

/// Reads and overwrites the persisted configuration document.
///
/// Every save is a full overwrite; there is no partial update at this level.
pub trait ConfigStore: Send + Sync {
    /// Read the persisted document.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet. The raw JSON
    /// value is returned unvalidated so callers can upgrade legacy layouts.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the document exists but cannot be read
    /// or parsed.
    fn load(&self) -> Result<Option<Value>, PironmanError>;

    /// Overwrite the persisted document.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the document cannot be written.
    fn save(&self, document: &ConfigDocument) -> Result<(), PironmanError>;
}
