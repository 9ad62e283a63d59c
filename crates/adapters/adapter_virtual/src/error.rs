//! Virtual adapter error types.

use std::path::PathBuf;

use pironman_domain::error::PironmanError;

/// Errors raised by the virtual collaborators.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// A `system` setting has a value the controller cannot use.
    #[error("invalid value for `{key}`: expected {expected}")]
    InvalidSetting {
        key: &'static str,
        expected: &'static str,
    },

    /// The animation file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The animation file is not a GIF.
    #[error("{} is not a GIF file", path.display())]
    NotAGif { path: PathBuf },

    /// The display was asked to draw while not initialised.
    #[error("display not ready")]
    NotReady,
}

impl VirtualError {
    fn component(&self) -> &'static str {
        match self {
            Self::InvalidSetting { .. } => "automation",
            Self::Read { .. } | Self::NotAGif { .. } | Self::NotReady => "oled",
        }
    }
}

impl From<VirtualError> for PironmanError {
    fn from(err: VirtualError) -> Self {
        Self::component(err.component(), err)
    }
}
