use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tungstenite::protocol::Message as WsMessage;

use crate::bus::Bus;
use crate::relay::fanout;
use crate::relay::message::Update;
use crate::relay::registry::{Registry, SharedRegistry};
use crate::transport::handshake;
use crate::transport::websocket::start_websocket_server;

#[test]
fn test_article_id_from_query() {
    assert_eq!(
        handshake::article_id(Some("article_id=42")),
        Some("42".to_string())
    );
    assert_eq!(
        handshake::article_id(Some("foo=1&article_id=abc%20def")),
        Some("abc def".to_string())
    );
    assert_eq!(handshake::article_id(Some("article_id=")), None);
    assert_eq!(handshake::article_id(Some("foo=1")), None);
    assert_eq!(handshake::article_id(None), None);
}

/// Spawns a relay listener on a free port. The bus points at a closed local
/// port, so publishes fail (and are swallowed) without a Redis around.
async fn setup_server() -> (String, SharedRegistry) {
    let addr = format!(
        "127.0.0.1:{}",
        portpicker::pick_unused_port().expect("No free ports")
    );
    let registry: SharedRegistry = Arc::new(Mutex::new(Registry::new()));
    let bus = Arc::new(Bus::open("redis://127.0.0.1:9").expect("parse bus url"));

    tokio::spawn(start_websocket_server(addr.clone(), registry.clone(), bus));

    // Give the server a moment to start up
    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, registry)
}

#[tokio::test]
async fn test_handshake_without_article_id_is_refused() {
    let (addr, registry) = setup_server().await;

    let result = connect_async(format!("ws://{}/ws", addr)).await;
    assert!(result.is_err());

    assert!(registry.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handshake_with_empty_article_id_is_refused() {
    let (addr, registry) = setup_server().await;

    let result = connect_async(format!("ws://{}/ws?article_id=", addr)).await;
    assert!(result.is_err());

    assert!(registry.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_handshake_registers_connection_under_its_article() {
    let (addr, registry) = setup_server().await;

    let (_ws, _) = connect_async(format!("ws://{}/ws?article_id=42", addr))
        .await
        .expect("WebSocket handshake failed");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(registry.lock().unwrap().snapshot("42").len(), 1);
    assert!(registry.lock().unwrap().snapshot("7").is_empty());
}

#[tokio::test]
async fn test_fanout_delivers_to_live_subscriber() {
    let (addr, registry) = setup_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws?article_id=42", addr))
        .await
        .expect("WebSocket handshake failed");
    tokio::time::sleep(Duration::from_millis(150)).await;

    let update = Update {
        article_id: "42".to_string(),
        content: "hello".to_string(),
    };
    fanout::deliver(&registry, &update);

    let frame = tokio::time::timeout(Duration::from_secs(1), ws.next())
        .await
        .expect("timed out waiting for delivery")
        .expect("stream ended")
        .expect("websocket error");
    let decoded: Update = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    assert_eq!(decoded, update);
}

#[tokio::test]
async fn test_client_close_unregisters_connection() {
    let (addr, registry) = setup_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws?article_id=7", addr))
        .await
        .expect("WebSocket handshake failed");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(registry.lock().unwrap().snapshot("7").len(), 1);

    ws.close(None).await.expect("close");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(registry.lock().unwrap().snapshot("7").is_empty());
    assert!(registry.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_publish_keeps_connection_subscribed() {
    let (addr, registry) = setup_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws?article_id=42", addr))
        .await
        .expect("WebSocket handshake failed");
    tokio::time::sleep(Duration::from_millis(150)).await;

    // The bus is unreachable, so this publish is dropped. The subscription
    // must survive it.
    ws.send(WsMessage::text(
        r#"{"article_id":"42","content":"hello"}"#.to_string(),
    ))
    .await
    .expect("send update");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(registry.lock().unwrap().snapshot("42").len(), 1);

    // Still deliverable after the failed publish.
    let update = Update {
        article_id: "42".to_string(),
        content: "still here".to_string(),
    };
    fanout::deliver(&registry, &update);
    let frame = tokio::time::timeout(Duration::from_secs(1), ws.next())
        .await
        .expect("timed out waiting for delivery")
        .expect("stream ended")
        .expect("websocket error");
    let decoded: Update = serde_json::from_str(frame.to_text().unwrap()).unwrap();
    assert_eq!(decoded, update);
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_subscribed() {
    let (addr, registry) = setup_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws?article_id=42", addr))
        .await
        .expect("WebSocket handshake failed");
    tokio::time::sleep(Duration::from_millis(150)).await;

    ws.send(WsMessage::text("not json".to_string()))
        .await
        .expect("send frame");
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(registry.lock().unwrap().snapshot("42").len(), 1);
}
