//! Configuration document: the JSON object persisted as `config.json`.
//!
//! The document always carries a `system` section holding the automation
//! settings. Other top-level sections belong to whoever wrote them (the
//! dashboard stores its own keys next to `system`).
//!
//! ## Merge rule
//! [`merge_value`] applies a patch recursively: when both sides hold an
//! object the keys are merged one by one, otherwise the patch value replaces
//! the target value. Keys absent from the patch are left untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PironmanError, ValidationError};

/// Key of the automation settings section.
pub const SYSTEM_KEY: &str = "system";

/// Deprecated name of the automation settings section.
pub const LEGACY_SYSTEM_KEY: &str = "auto";

/// A configuration document: a JSON object with a `system` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    /// Build the default document `{"system": <defaults>}`.
    #[must_use]
    pub fn with_system(system: Map<String, Value>) -> Self {
        let mut root = Map::new();
        root.insert(SYSTEM_KEY.to_string(), Value::Object(system));
        Self(root)
    }

    /// Wrap a raw JSON value without requiring a `system` section.
    ///
    /// Loaded documents are partial by nature; call [`validate`](Self::validate)
    /// once they have been merged over defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnObject`] when `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, PironmanError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject.into()),
        }
    }

    /// Rewrite the deprecated `{"auto": {...}}` layout to `{"system": {...}}`.
    ///
    /// Documents written in the legacy layout only ever held automation
    /// settings, so the upgraded document keeps nothing but the converted
    /// section. Documents already in the current layout are returned as-is.
    #[must_use]
    pub fn upgrade(mut self) -> Self {
        match self.0.remove(LEGACY_SYSTEM_KEY) {
            Some(legacy) => {
                let mut root = Map::new();
                root.insert(SYSTEM_KEY.to_string(), legacy);
                Self(root)
            }
            None => self,
        }
    }

    /// Check that the document carries an object-valued `system` section.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingSection`] otherwise.
    pub fn validate(&self) -> Result<(), PironmanError> {
        if self.system().is_none() {
            return Err(ValidationError::MissingSection(SYSTEM_KEY).into());
        }
        Ok(())
    }

    /// Merge `patch` into this document; values from `patch` win.
    pub fn merge(&mut self, patch: &Map<String, Value>) {
        merge_map(&mut self.0, patch);
    }

    /// The automation settings section, if present and an object.
    #[must_use]
    pub fn system(&self) -> Option<&Map<String, Value>> {
        self.0.get(SYSTEM_KEY).and_then(Value::as_object)
    }

    /// Borrow the top-level object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Recursively merge `patch` into `target`; `patch` wins on conflicts.
pub fn merge_value(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => merge_map(target, patch),
        (target, patch) => *target = patch.clone(),
    }
}

fn merge_map(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        match target.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
