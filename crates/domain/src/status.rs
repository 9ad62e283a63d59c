//! Status snapshot: what the automation controller reports on each change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// UTC timestamp attached to status snapshots.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A point-in-time set of readings (temperatures, fan state, …).
///
/// The value set is open: each automation controller decides which keys it
/// reports, and the dashboard renders whatever it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub timestamp: Timestamp,
    pub values: Map<String, Value>,
}

impl Status {
    /// Create a snapshot stamped with the current time.
    #[must_use]
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            timestamp: now(),
            values,
        }
    }

    /// Reading named `key`, if the controller reported one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}
