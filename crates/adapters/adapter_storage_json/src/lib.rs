//! # pironman-adapter-storage-json
//!
//! File persistence adapter for the configuration document.
//!
//! ## Responsibilities
//! - Implement the `ConfigStore` port defined in `pironman-app::ports`
//! - Read `config.json` if it exists, report `None` if it does not
//! - Overwrite the whole file on every save, pretty-printed with a 4-space
//!   indent so the file stays easy to edit by hand
//!
//! No atomic rename or file locking is performed; a concurrent external
//! writer can race with the daemon.
//!
//! ## Dependency rule
//! Depends on `pironman-app` (for port traits) and `pironman-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
mod store;

pub use error::StorageError;
pub use store::JsonFileStore;
