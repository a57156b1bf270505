use std::fmt;

#[derive(Debug)]
pub enum ComError {
    Io(std::io::Error),
    ConnectionClosed,
    MessageTooLarge(usize),
    InvalidUri(String),
    WebSocket(tokio_websockets::Error),
    Http(reqwest::Error),
    Status(u16, String),
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::ConnectionClosed => write!(f, "connection closed"),
            ComError::MessageTooLarge(len) => write!(f, "message too large: {len} bytes"),
            ComError::InvalidUri(uri) => write!(f, "invalid uri: {uri}"),
            ComError::WebSocket(err) => write!(f, "websocket error: {err}"),
            ComError::Http(err) => write!(f, "http error: {err}"),
            ComError::Status(code, body) => write!(f, "http status {code}: {body}"),
        }
    }
}

impl std::error::Error for ComError {}

impl From<std::io::Error> for ComError {
    fn from(err: std::io::Error) -> Self {
        ComError::Io(err)
    }
}

impl From<tokio_websockets::Error> for ComError {
    fn from(err: tokio_websockets::Error) -> Self {
        ComError::WebSocket(err)
    }
}

impl From<reqwest::Error> for ComError {
    fn from(err: reqwest::Error) -> Self {
        ComError::Http(err)
    }
}
