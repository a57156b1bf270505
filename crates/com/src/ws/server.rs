use {
    crate::ComError,
    base::*,
    futures_util::{SinkExt, StreamExt},
    std::{collections::HashMap, net::SocketAddr, sync::Arc},
    tokio::{
        net::{TcpListener, TcpStream, ToSocketAddrs},
        sync::{RwLock, mpsc},
        task::JoinHandle,
    },
    tokio_websockets::{Message, ServerBuilder, WebSocketStream},
};

type WsSink = futures_util::stream::SplitSink<WebSocketStream<TcpStream>, Message>;
type Clients = Arc<RwLock<HashMap<SocketAddr, WsSink>>>;

/// Text WebSocket server.
///
/// Every text message from every client is delivered through [`WsServer::recv`]
/// tagged with the sender's address, so the caller can answer with
/// [`WsServer::send_to`].
pub struct WsServer {
    clients: Clients,
    rx: mpsc::Receiver<(SocketAddr, String)>,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

async fn read_client(
    addr: SocketAddr,
    mut reader: futures_util::stream::SplitStream<WebSocketStream<TcpStream>>,
    tx: mpsc::Sender<(SocketAddr, String)>,
    clients: Clients,
) {
    loop {
        match reader.next().await {
            Some(Ok(msg)) => {
                if let Some(text) = msg.as_text() {
                    if text.len() > crate::MAX_MESSAGE_SIZE {
                        log_warn!("message from {} too large: {} bytes", addr, text.len());
                        continue;
                    }
                    if tx.send((addr, text.to_string())).await.is_err() {
                        break;
                    }
                }
            }
            Some(Err(e)) => {
                log_warn!("client {} error: {}", addr, e);
                break;
            }
            None => {
                log_debug!("client {} disconnected", addr);
                break;
            }
        }
    }
    clients.write().await.remove(&addr);
}

impl WsServer {
    /// Bind a listener and start accepting connections in the background.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let clients: Clients = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = mpsc::channel(256);

        let accept_clients = clients.clone();
        let accept_task = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((tcp_stream, addr)) => {
                        let ws_stream = match ServerBuilder::new().accept(tcp_stream).await {
                            Ok((_request, ws_stream)) => ws_stream,
                            Err(e) => {
                                log_warn!("websocket handshake failed for {}: {}", addr, e);
                                continue;
                            }
                        };
                        let (write_half, read_half) = ws_stream.split();
                        accept_clients.write().await.insert(addr, write_half);
                        tokio::spawn(read_client(
                            addr,
                            read_half,
                            tx.clone(),
                            accept_clients.clone(),
                        ));
                    }
                    Err(e) => {
                        log_warn!("accept error: {}", e);
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }
        });

        Ok(Self {
            clients,
            rx,
            accept_task,
            local_addr,
        })
    }

    /// Next text message from any client.
    pub async fn recv(&mut self) -> Result<(SocketAddr, String), ComError> {
        self.rx.recv().await.ok_or(ComError::ConnectionClosed)
    }

    /// Reply to one client. Fails with `ConnectionClosed` if it is gone.
    pub async fn send_to(&self, addr: SocketAddr, text: impl Into<String>) -> Result<(), ComError> {
        let mut lock = self.clients.write().await;
        let writer = lock.get_mut(&addr).ok_or(ComError::ConnectionClosed)?;
        if let Err(e) = writer.send(Message::text(text.into())).await {
            lock.remove(&addr);
            return Err(ComError::from(e));
        }
        Ok(())
    }

    /// Send to every client, dropping those that fail.
    pub async fn broadcast(&self, text: impl Into<String>) {
        let msg = Message::text(text.into());
        let mut lock = self.clients.write().await;
        let mut failed = Vec::new();
        for (addr, writer) in lock.iter_mut() {
            if let Err(e) = writer.send(msg.clone()).await {
                log_warn!("failed to send to {}: {}", addr, e);
                failed.push(*addr);
            }
        }
        for addr in failed {
            lock.remove(&addr);
        }
    }

    /// Close every client connection.
    pub async fn disconnect_all(&self) {
        let mut lock = self.clients.write().await;
        for (addr, mut writer) in lock.drain() {
            if let Err(e) = writer.close().await {
                log_debug!("closing {} failed: {}", addr, e);
            }
        }
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for WsServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}
