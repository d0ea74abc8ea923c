use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::connection::{Connection, ConnectionId};
use crate::relay::topic::Topic;

/// The registry as every task sees it: a single mutex per process.
///
/// Critical sections are bounded map operations; nothing is awaited and no
/// frame is written while the lock is held.
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Maps each article to the set of connections currently subscribed to it.
///
/// The registry is the only shared mutable state in the relay. The ingest
/// path registers a connection when its client attaches and unregisters it
/// when its read loop ends; the fan-out path unregisters a connection when
/// a write to it fails. Both use the same `unregister`, which is a no-op
/// for a pair that is already gone, so the two paths cannot disagree about
/// a connection's liveness.
#[derive(Debug, Default)]
pub struct Registry {
    topics: HashMap<String, Topic>,
    connections: HashMap<ConnectionId, Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `connection` to the subscriber set for `topic`, creating the
    /// topic on first use. Registering the same pair twice has no effect.
    pub fn register(&mut self, topic: &str, connection: Connection) {
        let entry = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        entry.insert(connection.id.clone());
        debug!(article = %topic, connection = %connection.id, "registered");
        self.connections.insert(connection.id.clone(), connection);
    }

    /// Removes `id` from `topic` and drops its handle.
    ///
    /// Dropping the handle releases the registry's half of the connection's
    /// channel, so removal and close happen together under the lock. A
    /// no-op when the pair is not present.
    pub fn unregister(&mut self, topic: &str, id: &ConnectionId) {
        if let Some(t) = self.topics.get_mut(topic) {
            t.remove(id);
        }
        if self.connections.remove(id).is_some() {
            debug!(article = %topic, connection = %id, "unregistered");
        }
    }

    /// Point-in-time copy of the subscribers for `topic`.
    ///
    /// Callers iterate the copy after releasing the lock; a stalled client
    /// must never hold up registrations from other connections. An unknown
    /// topic yields an empty list, same as a topic whose last subscriber
    /// left.
    pub fn snapshot(&self, topic: &str) -> Vec<Connection> {
        match self.topics.get(topic) {
            Some(t) => t
                .members
                .iter()
                .filter_map(|id| self.connections.get(id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// True when no connection is registered under any topic.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
