//! Config service: load, upgrade, merge and persist the config document.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use pironman_domain::config::{ConfigDocument, SYSTEM_KEY};
use pironman_domain::error::{PironmanError, ValidationError};

use crate::ports::ConfigStore;

/// Owns the in-memory config document and keeps the store in sync with it.
///
/// The document in the store always equals the last successfully merged
/// in-memory document: a merge whose save fails is discarded.
pub struct ConfigService<S> {
    store: S,
    document: Mutex<ConfigDocument>,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Load the persisted document over `defaults` and write the result back.
    ///
    /// Never fails. A missing document, an unreadable one, or one whose
    /// `system` section is not an object leaves the service on defaults.
    /// Legacy `auto` documents are upgraded before merging, so the store is
    /// migrated forward on every start.
    #[tracing::instrument(skip_all)]
    pub fn load(store: S, defaults: Map<String, Value>) -> Self {
        let mut document = ConfigDocument::with_system(defaults);

        match read_upgraded(&store) {
            Ok(Some(loaded)) => {
                let mut merged = document.clone();
                merged.merge(loaded.as_map());
                match merged.validate() {
                    Ok(()) => document = merged,
                    Err(err) => {
                        tracing::warn!(error = %err, "persisted config is invalid, using defaults");
                    }
                }
            }
            Ok(None) => tracing::info!("no persisted config, writing defaults"),
            Err(err) => tracing::warn!(error = %err, "failed to load config, using defaults"),
        }

        if let Err(err) = store.save(&document) {
            tracing::error!(error = %err, "failed to persist config");
        }

        Self {
            store,
            document: Mutex::new(document),
        }
    }

    /// Snapshot of the merged document.
    #[must_use]
    pub fn document(&self) -> ConfigDocument {
        self.lock().clone()
    }

    /// Snapshot of the `system` section.
    #[must_use]
    pub fn system(&self) -> Map<String, Value> {
        self.lock().system().cloned().unwrap_or_default()
    }

    /// Merge `patch` into the document and overwrite the store.
    ///
    /// # Errors
    ///
    /// Returns [`PironmanError::Validation`] if the patch would turn `system`
    /// into a non-object, or a storage error if the save fails. In both cases
    /// the in-memory document is left unchanged.
    #[tracing::instrument(skip_all, fields(keys = patch.len()))]
    pub fn apply(&self, patch: &Map<String, Value>) -> Result<ConfigDocument, PironmanError> {
        let mut document = self.lock();
        let mut merged = document.clone();
        merged.merge(patch);
        merged.validate()?;
        self.store.save(&merged)?;
        *document = merged.clone();
        tracing::debug!("config updated");
        Ok(merged)
    }

    fn lock(&self) -> MutexGuard<'_, ConfigDocument> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Merge `patch` into whatever the store currently holds, bypassing any
/// in-memory state.
///
/// Meant for tools editing the document while the daemon is not running.
///
/// # Errors
///
/// Returns [`ValidationError::MissingSection`] when the store is empty or
/// the result has no `system` object, or a storage error from the store.
pub fn patch_store<S: ConfigStore>(
    store: &S,
    patch: &Map<String, Value>,
) -> Result<ConfigDocument, PironmanError> {
    let mut current =
        read_upgraded(store)?.ok_or(ValidationError::MissingSection(SYSTEM_KEY))?;
    current.merge(patch);
    current.validate()?;
    store.save(&current)?;
    Ok(current)
}

fn read_upgraded<S: ConfigStore>(store: &S) -> Result<Option<ConfigDocument>, PironmanError> {
    store
        .load()?
        .map(|raw| ConfigDocument::from_value(raw).map(ConfigDocument::upgrade))
        .transpose()
}
