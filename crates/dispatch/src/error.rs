use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The frame source has not become available yet.
    SourceNotReady,
    /// Encoding or transmitting a frame failed.
    Send(String),
    /// The detector answered with something that could not be parsed.
    Receive(String),
    /// The streaming connection could not be opened or went away.
    ConnectionLost(String),
    /// The channel task is no longer running.
    ChannelClosed,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::SourceNotReady => write!(f, "frame source not ready"),
            DispatchError::Send(msg) => write!(f, "send failed: {msg}"),
            DispatchError::Receive(msg) => write!(f, "invalid response: {msg}"),
            DispatchError::ConnectionLost(msg) => write!(f, "connection lost: {msg}"),
            DispatchError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<com::ComError> for DispatchError {
    fn from(err: com::ComError) -> Self {
        DispatchError::Send(err.to_string())
    }
}

impl From<image::ImageError> for DispatchError {
    fn from(err: image::ImageError) -> Self {
        DispatchError::Send(err.to_string())
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Receive(err.to_string())
    }
}
