//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PironmanError`] via `From` when crossing a port boundary.

use std::error::Error;

/// Base error type shared by the domain, the application layer and the
/// port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PironmanError {
    /// A domain invariant was violated.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading or writing persisted state failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn Error + Send + Sync>),

    /// A collaborator component (automation, dashboard, display) failed.
    #[error("{component} failed: {source}")]
    Component {
        component: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl PironmanError {
    /// Wrap an arbitrary error raised by a named collaborator.
    pub fn component(
        component: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Component {
            component,
            source: source.into(),
        }
    }
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The configuration document (or a patch) is not a JSON object.
    #[error("config document must be a JSON object")]
    NotAnObject,

    /// A required section is missing or is not a JSON object.
    #[error("config section `{0}` is missing or not an object")]
    MissingSection(&'static str),

    /// A log level name could not be parsed.
    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
}
