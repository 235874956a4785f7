//! Connection handle over an upgraded axum WebSocket.

use std::{io, time::Duration};

use async_trait::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::Mutex;

use super::CloseSignal;
use crate::{
    domain::{Connection, ConnectionError, Message, Submission},
    infrastructure::dto::websocket::{IncomingChatMessage, OutgoingChatMessage},
};

/// How long `close` waits for the close frame to reach the peer.
const CLOSE_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket connection speaking the JSON chat wire format.
///
/// The socket is split so that the read pump and the write pump never
/// contend for the same lock. Closing trips a [`CloseSignal`] first, which
/// aborts any read or write still waiting on the peer, then sends a close
/// frame and drops both halves, releasing the socket even if the peer never
/// reads again.
pub struct WsConnection {
    sink: Mutex<Option<SplitSink<WebSocket, WsMessage>>>,
    stream: Mutex<Option<SplitStream<WebSocket>>>,
    closed: CloseSignal,
}

impl WsConnection {
    pub fn new(socket: WebSocket) -> Self {
        let (sink, stream) = socket.split();
        Self {
            sink: Mutex::new(Some(sink)),
            stream: Mutex::new(Some(stream)),
            closed: CloseSignal::new(),
        }
    }
}

/// Decode one WebSocket frame. `None` means the frame carries no message.
fn decode_frame(frame: WsMessage) -> Option<Result<Submission, ConnectionError>> {
    let decoded = match frame {
        WsMessage::Text(text) => serde_json::from_str::<IncomingChatMessage>(text.as_str()),
        WsMessage::Binary(bytes) => serde_json::from_slice::<IncomingChatMessage>(&bytes),
        WsMessage::Ping(_) | WsMessage::Pong(_) => return None,
        WsMessage::Close(_) => return Some(Err(ConnectionError::Closed)),
    };
    Some(decoded.map(Submission::from).map_err(ConnectionError::Decode))
}

fn encode_message(message: &Message) -> Result<WsMessage, ConnectionError> {
    let json = serde_json::to_string(&OutgoingChatMessage::from(message))
        .map_err(ConnectionError::Encode)?;
    Ok(WsMessage::Text(json.into()))
}

/// Close `sink`, giving up after `wait`. The sink is dropped either way.
async fn close_sink<S>(mut sink: S, wait: Duration) -> Result<(), ConnectionError>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    match tokio::time::timeout(wait, sink.close()).await {
        Ok(closed) => closed.map_err(ConnectionError::transport),
        Err(_) => Err(ConnectionError::transport(io::Error::new(
            io::ErrorKind::TimedOut,
            "close handshake timed out",
        ))),
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn read_message(&self) -> Result<Submission, ConnectionError> {
        if self.closed.is_closed() {
            return Err(ConnectionError::Closed);
        }
        let mut stream = self.stream.lock().await;
        let Some(stream) = stream.as_mut() else {
            return Err(ConnectionError::Closed);
        };

        loop {
            let frame = tokio::select! {
                _ = self.closed.closed() => return Err(ConnectionError::Closed),
                frame = stream.next() => frame,
            };

            match frame {
                None => return Err(ConnectionError::Closed),
                Some(Err(e)) => return Err(ConnectionError::transport(e)),
                Some(Ok(frame)) => {
                    if let Some(result) = decode_frame(frame) {
                        return result;
                    }
                }
            }
        }
    }

    async fn write_message(&self, message: &Message) -> Result<(), ConnectionError> {
        if self.closed.is_closed() {
            return Err(ConnectionError::Closed);
        }
        let frame = encode_message(message)?;
        let mut sink = self.sink.lock().await;
        let Some(sink) = sink.as_mut() else {
            return Err(ConnectionError::Closed);
        };

        tokio::select! {
            _ = self.closed.closed() => Err(ConnectionError::Closed),
            sent = sink.send(frame) => sent.map_err(ConnectionError::transport),
        }
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        if !self.closed.trigger() {
            return Ok(());
        }
        // Pending reads and writes release their locks once the signal trips.
        let sink = self.sink.lock().await.take();
        let stream = self.stream.lock().await.take();

        let closed = match sink {
            Some(sink) => close_sink(sink, CLOSE_HANDSHAKE_TIMEOUT).await,
            None => Ok(()),
        };
        drop(stream);
        closed
    }
}
