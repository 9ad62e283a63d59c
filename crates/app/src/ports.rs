//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod automation;
pub mod config_store;
pub mod dashboard;
pub mod log_control;
pub mod oled;

pub use automation::{Automation, StatusListener};
pub use config_store::ConfigStore;
pub use dashboard::{ConfigListener, Dashboard, NoDashboard};
pub use log_control::LogLevelControl;
pub use oled::Oled;
