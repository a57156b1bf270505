use {
    com::{ComError, WsClient, WsServer},
    std::time::Duration,
    tokio::time::timeout,
};

async fn start_server() -> (WsServer, String) {
    let server = WsServer::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", server.local_addr());
    (server, url)
}

async fn wait_for_clients(server: &WsServer, count: usize) {
    for _ in 0..100 {
        if server.client_count().await == count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {count} clients");
}

#[tokio::test]
async fn client_sends_text_to_server() {
    let (mut server, url) = start_server().await;
    let mut client = WsClient::connect(&url).await.unwrap();

    client.send_text("hello").await.unwrap();
    let (_, text) = timeout(Duration::from_secs(2), server.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn server_replies_to_sender() {
    let (mut server, url) = start_server().await;
    let mut client = WsClient::connect(&url).await.unwrap();

    client.send_text("ping").await.unwrap();
    let (addr, text) = timeout(Duration::from_secs(2), server.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(text, "ping");
    server.send_to(addr, "pong").await.unwrap();

    let reply = timeout(Duration::from_secs(2), client.recv_text())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "pong");
}

#[tokio::test]
async fn split_halves_work_independently() {
    let (mut server, url) = start_server().await;
    let client = WsClient::connect(&url).await.unwrap();
    let (mut sender, mut receiver) = client.split();

    let reader = tokio::spawn(async move { receiver.recv_text().await });

    sender.send_text("frame").await.unwrap();
    let (addr, _) = timeout(Duration::from_secs(2), server.recv())
        .await
        .unwrap()
        .unwrap();
    server.send_to(addr, "result").await.unwrap();

    let got = timeout(Duration::from_secs(2), reader)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(got, "result");
}

#[tokio::test]
async fn broadcast_reaches_all_clients() {
    let (server, url) = start_server().await;
    let mut a = WsClient::connect(&url).await.unwrap();
    let mut b = WsClient::connect(&url).await.unwrap();
    wait_for_clients(&server, 2).await;

    server.broadcast("all").await;

    assert_eq!(a.recv_text().await.unwrap(), "all");
    assert_eq!(b.recv_text().await.unwrap(), "all");
}

#[tokio::test]
async fn server_disconnect_ends_client_stream() {
    let (server, url) = start_server().await;
    let mut client = WsClient::connect(&url).await.unwrap();
    wait_for_clients(&server, 1).await;

    server.disconnect_all().await;

    let result = timeout(Duration::from_secs(2), client.recv_text())
        .await
        .unwrap();
    assert!(result.is_err());
    assert_eq!(server.client_count().await, 0);
}

#[tokio::test]
async fn client_close_removes_it_from_server() {
    let (server, url) = start_server().await;
    let client = WsClient::connect(&url).await.unwrap();
    wait_for_clients(&server, 1).await;

    client.close().await.unwrap();
    wait_for_clients(&server, 0).await;
}

#[tokio::test]
async fn send_to_unknown_client_fails() {
    let (server, _url) = start_server().await;
    let addr = "127.0.0.1:1".parse().unwrap();
    let result = server.send_to(addr, "nobody").await;
    assert!(matches!(result, Err(ComError::ConnectionClosed)));
}

#[tokio::test]
async fn connect_to_closed_port_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WsClient::connect(&format!("ws://{addr}")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn connect_with_invalid_url_fails() {
    let result = WsClient::connect("not a url").await;
    assert!(matches!(result, Err(ComError::InvalidUri(_))));
}
