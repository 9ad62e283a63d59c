//! # pironman-domain
//!
//! Pure domain model for the pironman5 case daemon.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, log levels, timestamps
//! - Define the **configuration document** (a JSON object with a required
//!   `system` section) together with its merge and legacy-upgrade rules
//! - Define **product variants** and the **peripherals** they expose
//! - Define the **device descriptor** handed to the dashboard
//! - Define the **status snapshot** published by the automation controller
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod log_level;

pub mod config;
pub mod device;
pub mod status;
pub mod variant;
