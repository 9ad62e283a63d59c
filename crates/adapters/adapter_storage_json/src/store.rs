//! [`ConfigStore`] implementation backed by a single JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use pironman_app::ports::ConfigStore;
use pironman_domain::config::ConfigDocument;
use pironman_domain::error::PironmanError;

use crate::error::StorageError;

const INDENT: &[u8] = b"    ";

/// Stores the config document as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Value>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&self, document: &ConfigDocument) -> Result<(), StorageError> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        document
            .serialize(&mut ser)
            .map_err(StorageError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, buf).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>, PironmanError> {
        let loaded = self.read()?;
        tracing::debug!(path = %self.path.display(), found = loaded.is_some(), "config read");
        Ok(loaded)
    }

    fn save(&self, document: &ConfigDocument) -> Result<(), PironmanError> {
        self.write(document)?;
        tracing::debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}
