//! Device descriptor: identity of the running product, shown by the dashboard.

use serde::{Deserialize, Serialize};

use crate::variant::Peripheral;

/// Transient description of this device, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub id: String,
    pub peripherals: Vec<Peripheral>,
    /// Version of the daemon driving the device.
    pub version: String,
}
