//! Log subscriber setup with a runtime-adjustable level.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry, reload};

use pironman_app::ports::LogLevelControl;
use pironman_domain::error::PironmanError;
use pironman_domain::log_level::LogLevel;

/// Target prefix shared by the daemon and every workspace crate.
const OWN_TARGET: &str = "pironman";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter")]
    Filter(#[from] ParseError),
    #[error("failed to install log subscriber")]
    Init(#[from] TryInitError),
}

/// Handle changing the daemon's level after the subscriber is installed.
pub struct ReloadLevel {
    handle: reload::Handle<EnvFilter, Registry>,
    base: String,
}

/// Install the global `fmt` subscriber filtered by `filter`.
///
/// # Errors
///
/// Returns an error if `filter` is not a valid directive list or a global
/// subscriber is already installed.
pub fn init(filter: &str) -> Result<ReloadLevel, LoggingError> {
    let (filter_layer, handle) = reload::Layer::new(EnvFilter::try_new(filter)?);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    Ok(ReloadLevel {
        handle,
        base: filter.to_string(),
    })
}

impl LogLevelControl for ReloadLevel {
    fn set_level(&self, level: LogLevel) -> Result<(), PironmanError> {
        let filter = EnvFilter::try_new(with_level(&self.base, level))
            .map_err(|err| PironmanError::component("logging", err))?;
        self.handle
            .reload(filter)
            .map_err(|err| PironmanError::component("logging", err))
    }
}

/// Rewrite `base` so every workspace target logs at `level`; directives for
/// other targets are kept.
fn with_level(base: &str, level: LogLevel) -> String {
    base.split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty() && !directive.starts_with(OWN_TARGET))
        .map(str::to_string)
        .chain(std::iter::once(format!("{OWN_TARGET}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}
