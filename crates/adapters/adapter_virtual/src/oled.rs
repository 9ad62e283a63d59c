//! Virtual OLED: accepts GIF files without drawing them.

use std::path::Path;

use tracing::Span;

use pironman_app::ports::Oled;
use pironman_domain::error::PironmanError;

use crate::error::VirtualError;

const GIF_SIGNATURES: [&[u8]; 2] = [b"GIF87a", b"GIF89a"];

/// Display stand-in reporting a fixed readiness.
pub struct VirtualOled {
    ready: bool,
    span: Span,
}

impl VirtualOled {
    #[must_use]
    pub fn new(ready: bool, span: Span) -> Self {
        Self { ready, span }
    }
}

impl Oled for VirtualOled {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn display_gif(&self, path: &Path) -> Result<(), PironmanError> {
        let _entered = self.span.enter();
        if !self.ready {
            return Err(VirtualError::NotReady.into());
        }

        let bytes = std::fs::read(path).map_err(|source| VirtualError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if !GIF_SIGNATURES.iter().any(|sig| bytes.starts_with(sig)) {
            return Err(VirtualError::NotAGif {
                path: path.to_path_buf(),
            }
            .into());
        }

        tracing::info!(path = %path.display(), bytes = bytes.len(), "GIF played");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(content: &[u8]) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn should_report_configured_readiness() {
        assert!(VirtualOled::new(true, Span::none()).is_ready());
        assert!(!VirtualOled::new(false, Span::none()).is_ready());
    }

    #[test]
    fn should_accept_gif89a_file() {
        let gif = write_file(b"GIF89a\x01\x00\x01\x00\x00\x00\x00;");
        let oled = VirtualOled::new(true, Span::none());
        assert!(oled.display_gif(gif.path()).is_ok());
    }

    #[test]
    fn should_reject_non_gif_file() {
        let png = write_file(b"\x89PNG\r\n\x1a\n");
        let oled = VirtualOled::new(true, Span::none());
        let err = oled.display_gif(png.path()).unwrap_err();
        assert!(matches!(
            err,
            PironmanError::Component {
                component: "oled",
                ..
            }
        ));
    }

    #[test]
    fn should_fail_for_missing_file() {
        let oled = VirtualOled::new(true, Span::none());
        assert!(oled.display_gif(Path::new("/nonexistent/splash.gif")).is_err());
    }

    #[test]
    fn should_refuse_to_draw_when_not_ready() {
        let gif = write_file(b"GIF87a");
        let oled = VirtualOled::new(false, Span::none());
        assert!(oled.display_gif(gif.path()).is_err());
    }
}
