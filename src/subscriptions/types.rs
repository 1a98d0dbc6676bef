//! Subscription types for stream change notifications.

use crate::streams::StreamState;
use crate::types::PostKey;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only these streams (None = every stream).
    pub stream_keys: Option<Vec<String>>,

    /// Include stream change events.
    pub include_streams: bool,

    /// Include card expand/collapse events.
    pub include_cards: bool,
}

impl SubscriptionFilter {
    /// Changes to specific streams.
    pub fn streams(stream_keys: Vec<String>) -> Self {
        Self {
            stream_keys: Some(stream_keys),
            include_streams: true,
            ..Default::default()
        }
    }

    /// Card expansion changes only.
    pub fn cards() -> Self {
        Self {
            include_cards: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            stream_keys: None,
            include_streams: true,
            include_cards: true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A stream changed after an action.
    StreamChanged {
        stream_key: String,
        /// Kind of the action that caused the change.
        action: String,
        stream: StreamSummary,
        /// Current stream after the action.
        current_stream: Option<String>,
    },

    /// A card was expanded or collapsed.
    CardToggled { post_key: PostKey, expanded: bool },

    /// Every card was collapsed.
    CardExpansionsReset,

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Summary of a stream (for events, avoids cloning the item lists).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub item_count: usize,
    pub pending_count: usize,
    pub selected: Option<PostKey>,
    pub last_page: bool,
    pub is_requesting: bool,
}

impl StreamSummary {
    pub fn from_stream(stream: &StreamState) -> Self {
        Self {
            item_count: stream.items.len(),
            pending_count: stream.pending_items.len(),
            selected: stream.selected.clone(),
            last_page: stream.last_page,
            is_requesting: stream.is_requesting,
        }
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StreamEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StreamEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StreamEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StreamEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
