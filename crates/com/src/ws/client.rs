use {
    crate::ComError,
    futures_util::{
        SinkExt, StreamExt,
        stream::{SplitSink, SplitStream},
    },
    tokio::net::TcpStream,
    tokio_websockets::{ClientBuilder, MaybeTlsStream, Message, WebSocketStream},
};

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Text WebSocket connection to a remote endpoint.
pub struct WsClient {
    stream: Stream,
}

/// Write half of a split [`WsClient`].
pub struct WsSender {
    sink: SplitSink<Stream, Message>,
}

/// Read half of a split [`WsClient`].
///
/// A read error is terminal: every later call reports `ConnectionClosed`.
pub struct WsReceiver {
    stream: SplitStream<Stream>,
    failed: bool,
}

fn parse_uri(url: &str) -> Result<http::Uri, ComError> {
    url.parse::<http::Uri>()
        .map_err(|e| ComError::InvalidUri(format!("{url}: {e}")))
}

// Pull the next text message, skipping control and binary frames.
async fn next_text<S>(stream: &mut S) -> Result<String, ComError>
where
    S: futures_util::Stream<Item = Result<Message, tokio_websockets::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(msg)) => {
                if msg.is_close() {
                    return Err(ComError::ConnectionClosed);
                }
                if let Some(text) = msg.as_text() {
                    if text.len() > crate::MAX_MESSAGE_SIZE {
                        return Err(ComError::MessageTooLarge(text.len()));
                    }
                    return Ok(text.to_string());
                }
            }
            Some(Err(e)) => return Err(ComError::from(e)),
            None => return Err(ComError::ConnectionClosed),
        }
    }
}

impl WsClient {
    /// Open a connection to `url` (e.g. `ws://localhost:8000/ws/detect-hand`).
    pub async fn connect(url: &str) -> Result<Self, ComError> {
        let uri = parse_uri(url)?;
        let (stream, _response) = ClientBuilder::from_uri(uri).connect().await?;
        Ok(Self { stream })
    }

    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), ComError> {
        self.stream.send(Message::text(text.into())).await?;
        Ok(())
    }

    /// Receive the next text message.
    ///
    /// Returns `ComError::ConnectionClosed` when the peer closes the socket.
    pub async fn recv_text(&mut self) -> Result<String, ComError> {
        next_text(&mut self.stream).await
    }

    pub async fn close(mut self) -> Result<(), ComError> {
        self.stream.close().await?;
        Ok(())
    }

    /// Split into halves that can be driven from different tasks.
    pub fn split(self) -> (WsSender, WsReceiver) {
        let (sink, stream) = self.stream.split();
        (
            WsSender { sink },
            WsReceiver {
                stream,
                failed: false,
            },
        )
    }
}

impl WsSender {
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), ComError> {
        self.sink.send(Message::text(text.into())).await?;
        Ok(())
    }

    /// Send a close frame. The read half sees the end of stream afterwards.
    pub async fn close(&mut self) -> Result<(), ComError> {
        self.sink.close().await?;
        Ok(())
    }
}

impl WsReceiver {
    pub async fn recv_text(&mut self) -> Result<String, ComError> {
        if self.failed {
            return Err(ComError::ConnectionClosed);
        }
        let result = next_text(&mut self.stream).await;
        if result.is_err() {
            self.failed = true;
        }
        result
    }
}
