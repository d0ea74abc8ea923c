use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use rand::Rng;
use tracing::{info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::bus::{Bus, UPDATES_CHANNEL};
use crate::relay::message::Update;
use crate::relay::registry::SharedRegistry;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Consumes the bus subscription for the life of the process, fanning each
/// update out to this process's subscribers of its article.
///
/// The subscription is re-established with bounded exponential backoff when
/// it fails; updates published during an outage are lost. The loop never
/// returns.
pub async fn run(bus: Arc<Bus>, registry: SharedRegistry) {
    let mut delay = INITIAL_BACKOFF;
    loop {
        match bus.pubsub().await {
            Ok(mut pubsub) => match pubsub.subscribe(UPDATES_CHANNEL).await {
                Ok(()) => {
                    info!(channel = UPDATES_CHANNEL, "subscribed to bus");
                    delay = INITIAL_BACKOFF;
                    let mut updates = pubsub.on_message();
                    while let Some(msg) = updates.next().await {
                        match serde_json::from_slice::<Update>(msg.get_payload_bytes()) {
                            Ok(update) => deliver(&registry, &update),
                            Err(e) => warn!("dropping undecodable bus payload: {}", e),
                        }
                    }
                    warn!("bus subscription ended");
                }
                Err(e) => warn!("bus subscribe failed: {}", e),
            },
            Err(e) => warn!("bus connection failed: {}", e),
        }

        let pause = jittered(delay);
        info!(millis = pause.as_millis() as u64, "waiting before re-subscribing");
        tokio::time::sleep(pause).await;
        delay = next_delay(delay);
    }
}

/// Writes `update` to every connection registered for its article.
///
/// Works on a snapshot, so the registry lock is free while frames are
/// queued. A connection whose writer is gone is unregistered on the spot
/// and never attempted again.
pub fn deliver(registry: &SharedRegistry, update: &Update) {
    let text = match serde_json::to_string(update) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialize update: {}", e);
            return;
        }
    };

    let members = registry.lock().unwrap().snapshot(&update.article_id);
    for conn in members {
        if conn.send(WsMessage::text(text.clone())).is_err() {
            warn!(connection = %conn.id, article = %update.article_id, "write failed, pruning connection");
            registry
                .lock()
                .unwrap()
                .unregister(&update.article_id, &conn.id);
        }
    }
}

/// Doubles the delay up to the cap.
pub(crate) fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_BACKOFF)
}

/// Spreads the delay by +/-10%.
pub(crate) fn jittered(delay: Duration) -> Duration {
    let base = delay.as_millis() as u64;
    let spread = base / 10;
    let ms = rand::thread_rng().gen_range(base - spread..=base + spread);
    Duration::from_millis(ms)
}
