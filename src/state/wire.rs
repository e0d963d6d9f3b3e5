//! Process-wide broadcast channel carrying finished action payloads.

use tokio::sync::broadcast;

/// Broadcast hub multiplexing every room's traffic over one channel.
///
/// All connected clients receive every published payload regardless of which
/// room they joined; scoping delivery to a room is the client's job. This
/// mirrors the source system's single shared channel (see DESIGN.md for the
/// open question around room-scoped channels).
pub struct WireHub {
    sender: broadcast::Sender<String>,
}

impl WireHub {
    /// Construct a hub backed by a Tokio broadcast channel with the given
    /// capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a subscriber that will receive subsequent payloads.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Publish a serialized payload to all current subscribers, ignoring
    /// delivery errors (no subscriber is not an error).
    pub fn publish(&self, payload: String) {
        let _ = self.sender.send(payload);
    }
}
