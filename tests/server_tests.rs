//! Serving over a real socket and draining on shutdown.

mod common;

use common::StalledStore;
use fresh_server::server::{serve, serve_with_grace};
use fresh_server::{AppState, MemoryConfigStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

#[tokio::test]
async fn serves_until_signalled() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let state = AppState::new(Arc::new(MemoryConfigStore::new()));
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stopped.await;
    }));

    let mut stream = TcpStream::connect(address).await.unwrap();
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("ok"), "{response}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn stuck_requests_are_abandoned_after_grace() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let store = StalledStore::default();
    let entered = store.entered.clone();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(serve_with_grace(
        listener,
        AppState::new(Arc::new(store)),
        async move {
            let _ = stopped.await;
        },
        Duration::from_millis(100),
    ));

    let mut stream = TcpStream::connect(address).await.unwrap();
    stream
        .write_all(b"GET /configs HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    entered.notified().await;

    stop.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop after the grace period")
        .unwrap()
        .unwrap();
}
