use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

/// Unique identifier for a connection within this process.
pub type ConnectionId = String;

/// Handle to one attached WebSocket client.
///
/// The sender feeds the connection's writer task, so [`Connection::send`]
/// queues a frame without performing network I/O and may be called from the
/// fan-out task while the owning ingest task only reads from the socket.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Unique identifier for the connection, used in logs and the registry.
    pub id: ConnectionId,

    sender: UnboundedSender<WsMessage>,
}

impl Connection {
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("conn-{}", Uuid::new_v4()),
            sender,
        }
    }

    /// Queue a frame for the writer task.
    ///
    /// Fails once the writer task has exited, which is how the fan-out path
    /// discovers a dead connection.
    pub fn send(&self, msg: WsMessage) -> Result<(), SendError<WsMessage>> {
        self.sender.send(msg)
    }
}
