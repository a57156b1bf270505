//! Network plumbing for talking to the remote detector.
//!
//! - [`HttpClient`]: one-shot multipart uploads (request/response).
//! - [`WsClient`]: persistent text WebSocket, splittable into independent
//!   send and receive halves.
//! - [`WsServer`]: minimal text WebSocket server that hands every message to
//!   the caller and lets it reply to the sending client.

pub mod error;
pub mod http;
pub mod ws;

pub use error::ComError;
pub use http::HttpClient;
pub use ws::{WsClient, WsReceiver, WsSender, WsServer};

/// Largest message accepted from the peer, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;
