//! # pironman-adapter-virtual
//!
//! Virtual/demo collaborators for running the daemon without the case
//! hardware (development machines, CI, a bare Pi).
//!
//! ## Provided collaborators
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`VirtualAutomation`] | `Automation` | Publishes CPU temperature and the fan decision every `data_interval` seconds |
//! | [`VirtualOled`] | `Oled` | Validates the GIF header instead of driving an I2C panel |
//!
//! ## Dependency rule
//!
//! Depends on `pironman-app` (port traits) and `pironman-domain` only.

mod automation;
pub mod error;
mod fan;
mod oled;

pub use automation::{DEFAULT_THERMAL_ZONE, VirtualAutomation};
pub use error::VirtualError;
pub use fan::FanMode;
pub use oled::VirtualOled;
