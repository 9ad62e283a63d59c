//! OLED port: the front-panel display.

use std::path::Path;
use std::sync::Arc;

use pironman_domain::error::PironmanError;

/// A small monochrome display able to play an animation.
pub trait Oled: Send + Sync {
    /// Whether the display was detected and initialised.
    fn is_ready(&self) -> bool;

    /// Play the GIF at `path` once.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the
    /// display rejects a frame.
    fn display_gif(&self, path: &Path) -> Result<(), PironmanError>;
}

impl<T: Oled> Oled for Arc<T> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn display_gif(&self, path: &Path) -> Result<(), PironmanError> {
        (**self).display_gif(path)
    }
}
