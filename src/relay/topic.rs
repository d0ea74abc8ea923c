use std::collections::HashSet;

use crate::connection::ConnectionId;

/// One article's subscriber set.
///
/// A topic is identified by the article id its subscribers asked for at
/// handshake time. Membership is a set, so registering the same connection
/// twice has no effect. An empty set and an absent topic mean the same
/// thing to lookups: no subscribers.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub members: HashSet<ConnectionId>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: HashSet::new(),
        }
    }

    /// Adds a connection to the topic. No effect if already present.
    pub fn insert(&mut self, id: ConnectionId) {
        self.members.insert(id);
    }

    /// Removes a connection from the topic. No effect if absent.
    pub fn remove(&mut self, id: &ConnectionId) {
        self.members.remove(id);
    }
}
