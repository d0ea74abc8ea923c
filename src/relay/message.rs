use serde::{Deserialize, Serialize};

/// A single article update as it travels over both wires.
///
/// The same JSON object is read from client frames, published to the bus,
/// and written back out to subscribers; the relay never transcodes between
/// the two. Decoding rejects objects missing either field and ignores any
/// extra ones.
///
/// # Fields
///
/// - `article_id` - The article this update belongs to. Never empty on the
///   sending side; an update for an article nobody subscribed to is simply
///   not delivered anywhere.
/// - `content` - The update body. Unconstrained, may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub article_id: String,
    pub content: String,
}
