//! Live relay: the registry of open viewer channels and best-effort fan-out.
//!
//! Delivery is fire-and-forget and at-most-once. Nothing is queued for a
//! viewer that is not connected at the moment of a broadcast.

use crate::domain::BroadcastEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

pub const WELCOME_MESSAGE: &str = "Connected to NASA Space Explorer server";

pub type ChannelId = u64;

/// Write half of one viewer connection, as seen by the relay
#[derive(Clone)]
pub struct ViewerChannel {
    sender: mpsc::UnboundedSender<String>,
}

impl ViewerChannel {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Non-blocking send; false means the viewer is gone
    fn send(&self, text: String) -> bool {
        self.is_open() && self.sender.send(text).is_ok()
    }
}

#[derive(Default)]
pub struct Relay {
    channels: Mutex<HashMap<ChannelId, ViewerChannel>>,
    next_id: AtomicU64,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly accepted channel and greet it.
    ///
    /// The greeting is queued before the channel joins the live set, so it is
    /// always the first event the viewer sees.
    pub async fn register(&self, channel: ViewerChannel) -> ChannelId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        match serde_json::to_string(&BroadcastEvent::connected(WELCOME_MESSAGE)) {
            Ok(text) => {
                channel.send(text);
            }
            Err(e) => error!("Failed to encode connection event: {}", e),
        }

        let mut channels = self.channels.lock().await;
        channels.insert(id, channel);
        info!(channel = id, live = channels.len(), "New client connected");
        id
    }

    /// Remove a channel; absent ids are ignored
    pub async fn unregister(&self, id: ChannelId) {
        let mut channels = self.channels.lock().await;
        if channels.remove(&id).is_some() {
            info!(channel = id, live = channels.len(), "Client disconnected");
        }
    }

    /// Serialize `event` once and write it to a snapshot of the live set.
    ///
    /// Channels found closed are pruned. Returns how many channels accepted
    /// the event.
    pub async fn broadcast(&self, event: &BroadcastEvent) -> usize {
        let text = match serde_json::to_string(event) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode broadcast event: {}", e);
                return 0;
            }
        };

        let snapshot: Vec<(ChannelId, ViewerChannel)> = {
            let channels = self.channels.lock().await;
            channels
                .iter()
                .map(|(id, ch)| (*id, ch.clone()))
                .collect()
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, channel) in snapshot {
            if channel.send(text.clone()) {
                delivered += 1;
            } else {
                dead.push(id);
            }
        }

        if !dead.is_empty() {
            let mut channels = self.channels.lock().await;
            for id in &dead {
                channels.remove(id);
            }
            debug!(pruned = ?dead, live = channels.len(), "Pruned closed channels");
        }

        delivered
    }

    pub async fn connected_count(&self) -> usize {
        self.channels.lock().await.len()
    }
}
