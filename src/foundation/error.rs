/// Result alias used across the driver set.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors surfaced by the drivers.
///
/// Most of these never reach the frontend: the video driver absorbs font failures at init and
/// reports malformed frames through its `accepted` flag. They stay typed so the layers that
/// detect them can log precisely.
#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    /// Settings could not be parsed or are out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// A font file could not be read or rasterized.
    #[error("font error: {0}")]
    Font(String),

    /// A submitted frame's geometry does not match its buffer.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Samples were written while the audio driver was stopped.
    #[error("audio driver is stopped")]
    AudioStopped,

    /// Settings (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriverError {
    /// Build a [`DriverError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DriverError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`DriverError::MalformedFrame`].
    pub fn malformed_frame(msg: impl Into<String>) -> Self {
        Self::MalformedFrame(msg.into())
    }

    /// Build a [`DriverError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
