use tokio::sync::broadcast;

use crate::live::message::LiveMessage;

/// Broadcast fan-out of received live messages.
///
/// Subscribers that fall behind lose the oldest messages; staleness is
/// acceptable here because every message also drives a cache
/// invalidation, so a lagging view simply refetches.
#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<LiveMessage>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveMessage> {
        self.sender.subscribe()
    }

    pub fn publish(
        &self,
        message: LiveMessage,
    ) -> Result<usize, broadcast::error::SendError<LiveMessage>> {
        self.sender.send(message)
    }
}
