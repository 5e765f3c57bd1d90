use futures_util::{SinkExt, StreamExt};
use rpsroom_common::{ClientMessage, ServerMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::transport::Transport;

/// WebSocket connection to the room server
pub struct WebSocketClient {
    tx: mpsc::UnboundedSender<ClientMessage>,
    server_messages: Arc<RwLock<Vec<ServerMessage>>>,
    connected: Arc<RwLock<bool>>,
    close_tx: Arc<RwLock<Option<mpsc::UnboundedSender<()>>>>,
}

impl WebSocketClient {
    pub async fn connect(ws_url: &str) -> Result<Self, ClientError> {
        let (ws_stream, _) = connect_async(ws_url).await?;
        let (mut write, mut read) = ws_stream.split();
        info!(ws_url, "connected");

        // Create channel for sending messages to server
        let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

        // Shared storage for server messages
        let server_messages = Arc::new(RwLock::new(Vec::new()));
        let server_messages_clone = server_messages.clone();

        // Connection status
        let connected = Arc::new(RwLock::new(true));
        let connected_read = connected.clone();
        let connected_write = connected.clone();

        // Channel for triggering close
        let (close_tx, mut close_rx) = mpsc::unbounded_channel::<()>();
        let close_tx_shared = Arc::new(RwLock::new(Some(close_tx)));

        // Spawn task to send messages to server
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Queued messages go out before a pending close
                    biased;

                    Some(msg) = rx.recv() => {
                        debug!(?msg, "[SEND]");

                        match serde_json::to_string(&msg) {
                            Ok(json) => {
                                if write.send(Message::Text(json)).await.is_err() {
                                    warn!("WebSocket send failed - connection may be lost");
                                    *connected_write.write().await = false;
                                    break;
                                }
                            }
                            Err(e) => warn!("failed to encode {msg:?}: {e}"),
                        }
                    }
                    Some(_) = close_rx.recv() => {
                        debug!("[EVENT] Closing WebSocket connection");
                        let _ = write.send(Message::Close(None)).await;
                        let _ = write.close().await;
                        *connected_write.write().await = false;
                        break;
                    }
                    else => break,
                }
            }
        });

        // Spawn task to receive messages from server
        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(server_msg) => {
                            debug!(?server_msg, "[RECV]");
                            server_messages_clone.write().await.push(server_msg);
                        }
                        Err(e) => warn!(%text, "dropping undecodable frame: {e}"),
                    },
                    Ok(Message::Close(_)) => {
                        info!("WebSocket connection closed by server");
                        *connected_read.write().await = false;
                        break;
                    }
                    Err(e) => {
                        warn!("WebSocket error: {e}");
                        *connected_read.write().await = false;
                        break;
                    }
                    _ => {}
                }
            }
        });

        Ok(WebSocketClient {
            tx,
            server_messages,
            connected,
            close_tx: close_tx_shared,
        })
    }

    /// Get and clear all pending server messages, in arrival order
    pub async fn get_messages(&self) -> Vec<ServerMessage> {
        let mut messages = self.server_messages.write().await;
        std::mem::take(&mut *messages)
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Close the connection after flushing queued messages
    pub async fn close(&self) {
        if let Some(tx) = self.close_tx.write().await.take() {
            let _ = tx.send(());
        }
    }
}

impl Transport for WebSocketClient {
    fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        self.tx.send(message).map_err(|_| ClientError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpsroom_common::{RoomId, Seat};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    #[tokio::test]
    async fn test_messages_flow_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let first = ws.next().await.unwrap().unwrap();
            assert_eq!(first.into_text().unwrap(), r#"{"type":"start_game"}"#);

            ws.send(Message::Text("not json".to_string())).await.unwrap();
            ws.send(Message::Text(
                r#"{"type":"players_assigned","room_id":7,"player1":"alice","player2":"bob"}"#.to_string(),
            ))
            .await
            .unwrap();
            ws.send(Message::Text(r#"{"type":"room_ready"}"#.to_string())).await.unwrap();

            // Leave must arrive before the close frame
            let leave = ws.next().await.unwrap().unwrap();
            let leave: ClientMessage = serde_json::from_str(&leave.into_text().unwrap()).unwrap();
            assert_eq!(leave, ClientMessage::LeaveRoom { seat: Seat::Player1, room_id: RoomId::new("7") });
        });

        let client = WebSocketClient::connect(&format!("ws://{addr}")).await.unwrap();
        client.send(ClientMessage::StartGame).unwrap();

        let mut received = Vec::new();
        for _ in 0..50 {
            received.extend(client.get_messages().await);
            if received.len() >= 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        // The malformed frame is dropped, order is preserved
        assert_eq!(received.len(), 2);
        assert!(matches!(received[0], ServerMessage::PlayersAssigned { .. }));
        assert_eq!(received[1], ServerMessage::RoomReady);

        client
            .send(ClientMessage::LeaveRoom { seat: Seat::Player1, room_id: RoomId::new("7") })
            .unwrap();
        client.close().await;

        server.await.unwrap();
    }
}
