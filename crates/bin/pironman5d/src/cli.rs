//! Command line: run the daemon, or edit the config document offline.

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use pironman_adapter_storage_json::JsonFileStore;
use pironman_app::services::config_service::patch_store;
use pironman_domain::config::ConfigDocument;
use pironman_domain::error::ValidationError;

/// pironman5 case daemon.
#[derive(Debug, Parser)]
#[command(name = "pironman5d", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the daemon (the default).
    Run,
    /// Merge a JSON patch into the config file and exit.
    ///
    /// Meant for when the daemon is stopped; a running daemon overwrites the
    /// file on its next edit.
    Patch {
        /// Partial document, e.g. `{"system": {"rgb_speed": 80}}`.
        json: String,
    },
}

/// Apply `json` to the document stored at `path` and return the result.
///
/// # Errors
///
/// Fails when `json` is not a JSON object, when the file is missing or
/// unreadable, or when it cannot be written back.
pub fn patch(path: &Path, json: &str) -> anyhow::Result<ConfigDocument> {
    let Value::Object(patch) =
        serde_json::from_str::<Value>(json).context("patch is not valid JSON")?
    else {
        return Err(ValidationError::NotAnObject.into());
    };
    let store = JsonFileStore::new(path);
    patch_store(&store, &patch).with_context(|| format!("failed to patch {}", path.display()))
}
