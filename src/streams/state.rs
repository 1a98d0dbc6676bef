//! Stream state values.

use crate::types::{PageHandle, PostKey, StreamKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// List state of a single stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Visible items, first-seen order, unique by canonical key.
    pub items: Vec<PostKey>,

    /// Fetched updates not yet merged into `items`, most recent first.
    pub pending_items: Vec<PostKey>,

    /// Keyboard-focused item. May reference a key not in `items`.
    pub selected: Option<PostKey>,

    /// Set once a page fetch came back empty. Never cleared.
    pub last_page: bool,

    /// A page fetch is outstanding.
    pub is_requesting: bool,

    /// Cursor for the next page fetch.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::types::deserialize_page_handle"
    )]
    pub page_handle: Option<PageHandle>,
}

impl StreamState {
    /// The canonical empty stream.
    pub fn empty() -> &'static StreamState {
        static EMPTY: OnceLock<StreamState> = OnceLock::new();
        EMPTY.get_or_init(StreamState::default)
    }

    pub fn update_count(&self) -> usize {
        self.pending_items.len()
    }
}

/// Top-level value holding every stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamsState {
    /// Per-stream state, created on first write.
    pub by_key: HashMap<StreamKey, StreamState>,

    /// Last stream that received a selection event.
    pub current_stream: Option<StreamKey>,

    /// Canonical keys of expanded cards.
    pub card_expansions: HashSet<String>,
}

impl StreamsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to a stream, creating it if absent.
    pub(crate) fn stream_mut(&mut self, stream_key: &str) -> &mut StreamState {
        self.by_key.entry(stream_key.to_string()).or_default()
    }

    /// Number of streams that have received at least one event.
    pub fn stream_count(&self) -> usize {
        self.by_key.len()
    }
}
