//! # pironman-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Automation`: the hardware automation controller (fans, LEDs, …)
//!   - `Dashboard`: the optional web dashboard
//!   - `Oled`: the front-panel display used for the startup splash
//!   - `ConfigStore`: persistence of the configuration document
//!   - `LogLevelControl`: runtime control of the daemon's own log level
//! - Define **listener traits** (`StatusListener`, `ConfigListener`) through
//!   which the two collaborators notify each other
//! - Provide the use-cases:
//!   - `ConfigService`: load, upgrade, merge and persist the config document
//!   - `Pironman`: wire the collaborators together and drive their lifecycle
//!
//! ## Dependency rule
//! Depends on `pironman-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod wiring;

#[cfg(test)]
mod testing;
