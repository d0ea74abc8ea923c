use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tracing::{info, warn};
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;
use tungstenite::protocol::Message as WsMessage;

use crate::bus::Bus;
use crate::connection::Connection;
use crate::relay::message::Update;
use crate::relay::registry::SharedRegistry;
use crate::transport::handshake;

/// Accepts WebSocket subscribers and runs one ingest loop per connection.
pub async fn start_websocket_server(addr: String, registry: SharedRegistry, bus: Arc<Bus>) {
    let listener = TcpListener::bind(&addr).await.expect("Can't bind");

    info!("relay listening on ws://{}", addr);

    while let Ok((stream, _)) = listener.accept().await {
        let registry = registry.clone();
        let bus = bus.clone();
        tokio::spawn(handle_connection(stream, registry, bus));
    }
}

/// Owns one connection end to end: handshake, register, read, unregister.
async fn handle_connection(stream: TcpStream, registry: SharedRegistry, bus: Arc<Bus>) {
    // Pull the article id out of the upgrade request; refuse the handshake
    // outright when it is absent so the socket never reaches the registry.
    let mut topic: Option<String> = None;
    let callback = |req: &Request, response: Response| match handshake::article_id(req.uri().query())
    {
        Some(id) => {
            topic = Some(id);
            Ok(response)
        }
        None => {
            let mut reject = ErrorResponse::new(Some("missing article_id".to_string()));
            *reject.status_mut() = StatusCode::BAD_REQUEST;
            Err(reject)
        }
    };

    let ws_stream = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake refused: {}", e);
            return;
        }
    };
    let Some(topic) = topic else { return };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let connection = Connection::new(tx);
    let id = connection.id.clone();

    // Writer task: drains the channel into the socket. It ends once every
    // sender handle is dropped or the socket refuses a write.
    let writer_id = id.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                warn!(connection = %writer_id, "write failed: {}", e);
                break;
            }
        }
    });

    // Register before reading so no delivered update can slip past us.
    registry.lock().unwrap().register(&topic, connection);
    info!(connection = %id, article = %topic, "subscriber attached");

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if msg.is_close() {
            break;
        }
        if !msg.is_text() {
            continue;
        }
        let Ok(text) = msg.to_text() else { continue };
        match serde_json::from_str::<Update>(text) {
            Ok(update) => {
                // Best effort: a failed publish loses this update but the
                // client keeps its subscription.
                if let Err(e) = bus.publish(&update).await {
                    warn!(connection = %id, "bus publish failed, update dropped: {}", e);
                }
            }
            Err(e) => {
                warn!(connection = %id, "dropping malformed client frame: {}", e);
            }
        }
    }

    // Single exit point for every termination path, so the pair is
    // unregistered exactly once by this task.
    registry.lock().unwrap().unregister(&topic, &id);
    info!(connection = %id, article = %topic, "subscriber detached");
}
