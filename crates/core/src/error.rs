/// Result alias that carries the custom [`SoundboardError`] type.
pub type Result<T> = std::result::Result<T, SoundboardError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SoundboardError {
    /// Free-form error for conditions that do not warrant their own variant,
    /// such as a library lookup miss or a malformed configuration file.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors (missing clip files, unreadable
    /// configuration).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The host refused to open an audio output stream.
    #[error("audio output unavailable: {0}")]
    Stream(#[from] rodio::StreamError),
    /// A sink could not be attached to the running output stream.
    #[error("playback failed: {0}")]
    Play(#[from] rodio::PlayError),
    /// The clip file exists but could not be decoded.
    #[error("could not decode clip: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    /// The decoder rejected a seek request.
    #[error("seek rejected: {0}")]
    Seek(#[from] rodio::source::SeekError),
}

impl SoundboardError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SoundboardError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SoundboardError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
