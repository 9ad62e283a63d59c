//! # pironman-adapter-http-axum
//!
//! Web dashboard built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Implement the `Dashboard` port: keep the latest automation status and
//!   forward user config edits to the registered `ConfigListener`
//! - Serve a small JSON API:
//!   - `GET  /health`
//!   - `GET  /api/device`: device descriptor, database name, `spc` flag
//!   - `GET  /api/status`: latest status snapshot
//!   - `GET  /api/status/stream`: status snapshots as Server-Sent Events
//!   - `GET  /api/config`: current config document
//!   - `POST /api/config`: apply a config patch
//! - Own the HTTP server lifecycle (bind on `start`, graceful shutdown on `stop`)
//!
//! ## Dependency rule
//! Depends on `pironman-app` (for port traits) and `pironman-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
mod dashboard;
pub mod error;
pub mod router;
pub mod state;

pub use dashboard::{DashboardSettings, HttpDashboard};
