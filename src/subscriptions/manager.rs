//! Subscription manager for broadcasting stream events.

use crate::streams::StreamState;
use crate::types::PostKey;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

use super::types::{
    DropReason, StreamEvent, StreamSummary, SubscriptionConfig, SubscriptionHandle,
    SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<StreamEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if buffer is full (subscriber will be dropped).
    fn try_send(&self, event: StreamEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Check if this subscription matches a stream change.
    fn matches_stream(&self, stream_key: &str) -> bool {
        if !self.config.filter.include_streams {
            return false;
        }

        if let Some(ref keys) = self.config.filter.stream_keys {
            return keys.iter().any(|key| key == stream_key);
        }

        true
    }

    fn wants_card_events(&self) -> bool {
        self.config.filter.include_cards
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription. Events start with the next broadcast.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort
            let _ = sub.sender.try_send(StreamEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    // --- Broadcasting ---

    /// Broadcast a stream change to matching subscriptions.
    pub fn broadcast_stream_changed(
        &self,
        stream_key: &str,
        action: &str,
        stream: &StreamState,
        current_stream: Option<&str>,
    ) {
        // Skip building the event when nobody listens.
        if self.subscriptions.read().is_empty() {
            return;
        }

        let event = StreamEvent::StreamChanged {
            stream_key: stream_key.to_string(),
            action: action.to_string(),
            stream: StreamSummary::from_stream(stream),
            current_stream: current_stream.map(str::to_string),
        };

        self.broadcast(|sub| sub.matches_stream(stream_key), event);
    }

    /// Broadcast a card expand/collapse.
    pub fn broadcast_card_toggled(&self, post_key: &PostKey, expanded: bool) {
        let event = StreamEvent::CardToggled {
            post_key: post_key.clone(),
            expanded,
        };

        self.broadcast(|sub| sub.wants_card_events(), event);
    }

    /// Broadcast that every card was collapsed.
    pub fn broadcast_card_expansions_reset(&self) {
        self.broadcast(
            |sub| sub.wants_card_events(),
            StreamEvent::CardExpansionsReset,
        );
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast<F>(&self, filter: F, event: StreamEvent)
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if filter(sub) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    warn!(subscription = id.0, "Dropping slow subscriber");
                    let _ = sub.sender.try_send(StreamEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
