use redis::aio::{ConnectionManager, PubSub};
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;

use crate::relay::message::Update;
use crate::utils::error::RelayError;

/// The one bus channel every relay process shares. Updates for all articles
/// fan in here; subscribers are matched against the article id at fan-out.
pub const UPDATES_CHANNEL: &str = "article_updates";

/// Handle to the message bus.
///
/// The publisher connection is built lazily on first publish and kept in a
/// `ConnectionManager`, which re-establishes it after drops. An unreachable
/// bus therefore costs dropped publishes, never a failed startup; the
/// subscription side recovers through the fan-out loop's own backoff.
pub struct Bus {
    client: Client,
    publisher: Mutex<Option<ConnectionManager>>,
}

impl Bus {
    /// Parses `url` and prepares a disconnected handle. No I/O happens
    /// until the first publish or subscription.
    pub fn open(url: &str) -> Result<Self, RelayError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            publisher: Mutex::new(None),
        })
    }

    /// Serializes `update` and publishes it on the shared channel.
    ///
    /// Errors are returned to the caller; there is no retry or buffering
    /// here. The ingest path logs them and keeps its connection alive.
    pub async fn publish(&self, update: &Update) -> Result<(), RelayError> {
        let payload = serde_json::to_vec(update)?;
        let mut conn = self.publisher_conn().await?;
        let _: () = conn.publish(UPDATES_CHANNEL, payload).await?;
        Ok(())
    }

    /// A dedicated connection for the fan-out loop's subscription.
    pub async fn pubsub(&self) -> Result<PubSub, RelayError> {
        Ok(self.client.get_async_pubsub().await?)
    }

    async fn publisher_conn(&self) -> Result<ConnectionManager, RelayError> {
        let mut guard = self.publisher.lock().await;
        match guard.as_ref() {
            Some(conn) => Ok(conn.clone()),
            None => {
                let conn = ConnectionManager::new(self.client.clone()).await?;
                *guard = Some(conn.clone());
                Ok(conn)
            }
        }
    }
}
