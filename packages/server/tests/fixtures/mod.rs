//! Test fixtures shared by the integration tests.
#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hubcast_server::{Hub, HubConfig, server};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const WAIT: Duration = Duration::from_secs(3);

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// In-process server bound to an ephemeral port. Shuts down on drop.
pub struct TestServer {
    addr: SocketAddr,
    hub: Hub,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(HubConfig::default()).await
    }

    pub async fn start_with(config: HubConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let hub = Hub::spawn(config);

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn({
            let hub = hub.clone();
            async move {
                server::serve(listener, hub, async {
                    let _ = signal.await;
                })
                .await
                .expect("Server failed");
            }
        });

        Self {
            addr,
            hub,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Poll until the hub has exactly `expected` registered clients.
    pub async fn wait_for_clients(&self, expected: usize) {
        let hub = self.hub.clone();
        tokio::time::timeout(WAIT, async move {
            while hub.client_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("hub never reached {expected} clients"));
    }

    /// Connect a client and wait until the hub has registered it.
    pub async fn connect(&self) -> WsStream {
        let before = self.hub.client_count().await;
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        self.wait_for_clients(before + 1).await;
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

pub async fn send_chat(ws: &mut WsStream, sender: &str, content: &str) {
    let payload = serde_json::json!({ "sender": sender, "content": content });
    ws.send(Message::text(payload.to_string()))
        .await
        .expect("Failed to send message");
}

/// Next chat message, skipping control frames. `None` on timeout, close or
/// end of stream.
pub async fn recv_chat(ws: &mut WsStream, wait: Duration) -> Option<serde_json::Value> {
    tokio::time::timeout(wait, async {
        while let Some(frame) = ws.next().await {
            match frame.ok()? {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}
