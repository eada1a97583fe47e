/// Convenience result type used across bowlstim.
pub type StimResult<T> = Result<T, StimError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Expected run-time deviations (sensor dropouts, break intervals, exhausted clips) are modelled
/// as state and never surface here. These variants cover setup failures and genuine IO problems.
#[derive(thiserror::Error, Debug)]
pub enum StimError {
    /// Invalid experiment configuration, detected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Media source could not be opened or decoded.
    #[error("media error: {0}")]
    Media(String),

    /// Geometry collaborator rejected a frame.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Output sink failed to present or persist a frame.
    #[error("sink error: {0}")]
    Sink(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StimError {
    /// Build a [`StimError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StimError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StimError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`StimError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Build a [`StimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
