//! Seams between the channels and the network.
//!
//! The channels only see these traits; `com` provides the real HTTP and
//! WebSocket implementations and tests plug in scripted ones.

use {
    crate::{DispatchError, FrameSnapshot},
    base::*,
    com::{ComError, HttpClient, WsClient, WsReceiver, WsSender},
    std::future::Future,
};

/// Multipart field carrying the frame.
pub const UPLOAD_FIELD: &str = "file";
/// File name attached to the uploaded frame.
pub const UPLOAD_FILE_NAME: &str = "frame.jpg";

/// One request, one response.
pub trait PollTransport: Send + Sync + 'static {
    /// Send a frame and return the raw response body.
    fn detect(
        &self,
        frame: FrameSnapshot,
    ) -> impl Future<Output = Result<String, DispatchError>> + Send;
}

/// Opens persistent connections for the streaming channel.
pub trait StreamConnector: Send + Sync + 'static {
    type Sender: FrameSender;
    type Receiver: ResultReceiver;

    fn open(
        &self,
    ) -> impl Future<Output = Result<(Self::Sender, Self::Receiver), DispatchError>> + Send;
}

/// Write side of a streaming connection.
pub trait FrameSender: Send + 'static {
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), DispatchError>> + Send;

    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// What the read side of a streaming connection can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Message(String),
    Error(String),
    Closed,
}

/// Read side of a streaming connection.
///
/// After `StreamEvent::Closed` the receiver is not polled again.
pub trait ResultReceiver: Send + 'static {
    fn next_event(&mut self) -> impl Future<Output = StreamEvent> + Send;
}

impl PollTransport for HttpClient {
    async fn detect(&self, frame: FrameSnapshot) -> Result<String, DispatchError> {
        let body = self
            .post_file(UPLOAD_FIELD, UPLOAD_FILE_NAME, image::JPEG_MIME, frame.jpeg)
            .await?;
        Ok(body)
    }
}

/// Connects to a WebSocket detector endpoint.
#[derive(Clone, Debug)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StreamConnector for WsConnector {
    type Sender = WsSender;
    type Receiver = WsReceiver;

    async fn open(&self) -> Result<(WsSender, WsReceiver), DispatchError> {
        let client = WsClient::connect(&self.url)
            .await
            .map_err(|e| DispatchError::ConnectionLost(e.to_string()))?;
        Ok(client.split())
    }
}

impl FrameSender for WsSender {
    async fn send_text(&mut self, text: String) -> Result<(), DispatchError> {
        WsSender::send_text(self, text).await?;
        Ok(())
    }

    async fn close(&mut self) {
        if let Err(e) = WsSender::close(self).await {
            log_debug!("websocket close: {}", e);
        }
    }
}

impl ResultReceiver for WsReceiver {
    async fn next_event(&mut self) -> StreamEvent {
        match self.recv_text().await {
            Ok(text) => StreamEvent::Message(text),
            Err(ComError::ConnectionClosed) => StreamEvent::Closed,
            Err(e) => StreamEvent::Error(e.to_string()),
        }
    }
}
