//! Stream actions and the pure transition function.

use crate::error::Result;
use crate::types::{unique_keys, PageHandle, PostKey, RawPost, StreamKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

use super::config::StreamStoreConfig;
use super::state::{StreamState, StreamsState};

/// Discrete events that drive stream state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamAction {
    // --- Data events ---
    /// A page fetch was started.
    PageRequested { stream_key: StreamKey },

    /// A page fetch finished. An empty `posts` marks the last page.
    PageReceived {
        stream_key: StreamKey,
        posts: Vec<PostKey>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "crate::types::deserialize_page_handle"
        )]
        page_handle: Option<PageHandle>,
    },

    /// A background update check found new posts.
    UpdatesReceived {
        stream_key: StreamKey,
        post_keys: Vec<PostKey>,
    },

    /// Merge pending updates into the visible items.
    ShowUpdates { stream_key: StreamKey },

    // --- Selection events ---
    ItemSelected {
        stream_key: StreamKey,
        post_key: PostKey,
    },

    /// Move the selection down within the currently visible `items`.
    SelectNextItem {
        stream_key: StreamKey,
        items: Vec<PostKey>,
    },

    /// Move the selection up within the currently visible `items`.
    SelectPrevItem {
        stream_key: StreamKey,
        items: Vec<PostKey>,
    },

    SelectFirstItem {
        stream_key: StreamKey,
        items: Vec<PostKey>,
    },

    // --- Card events ---
    CardExpanded { post_key: PostKey },

    CardCollapsed { post_key: PostKey },

    /// Collapse every card, e.g. when a stream is shown or replaced.
    CardExpansionsReset,
}

impl StreamAction {
    /// Build a `PageReceived` from raw post records.
    ///
    /// Key derivation is the only fallible step, so it happens here rather
    /// than inside the reducer.
    pub fn page_received(
        stream_key: impl Into<StreamKey>,
        posts: &[RawPost],
        page_handle: Option<PageHandle>,
    ) -> Result<Self> {
        let posts = posts.iter().map(PostKey::from_post).collect::<Result<Vec<_>>>()?;
        Ok(StreamAction::PageReceived {
            stream_key: stream_key.into(),
            posts,
            page_handle,
        })
    }

    /// Build a `PageReceived` from a JSON array of posts.
    pub fn page_received_json(
        stream_key: impl Into<StreamKey>,
        posts: serde_json::Value,
        page_handle: Option<serde_json::Value>,
    ) -> Result<Self> {
        let posts = RawPost::list_from_json(posts)?;
        Self::page_received(stream_key, &posts, page_handle.map(PageHandle))
    }

    /// The stream this action targets, if any.
    pub fn stream_key(&self) -> Option<&str> {
        match self {
            StreamAction::PageRequested { stream_key }
            | StreamAction::PageReceived { stream_key, .. }
            | StreamAction::UpdatesReceived { stream_key, .. }
            | StreamAction::ShowUpdates { stream_key }
            | StreamAction::ItemSelected { stream_key, .. }
            | StreamAction::SelectNextItem { stream_key, .. }
            | StreamAction::SelectPrevItem { stream_key, .. }
            | StreamAction::SelectFirstItem { stream_key, .. } => Some(stream_key.as_str()),
            StreamAction::CardExpanded { .. }
            | StreamAction::CardCollapsed { .. }
            | StreamAction::CardExpansionsReset => None,
        }
    }

    /// Short name for logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamAction::PageRequested { .. } => "page_requested",
            StreamAction::PageReceived { .. } => "page_received",
            StreamAction::UpdatesReceived { .. } => "updates_received",
            StreamAction::ShowUpdates { .. } => "show_updates",
            StreamAction::ItemSelected { .. } => "item_selected",
            StreamAction::SelectNextItem { .. } => "select_next_item",
            StreamAction::SelectPrevItem { .. } => "select_prev_item",
            StreamAction::SelectFirstItem { .. } => "select_first_item",
            StreamAction::CardExpanded { .. } => "card_expanded",
            StreamAction::CardCollapsed { .. } => "card_collapsed",
            StreamAction::CardExpansionsReset => "card_expansions_reset",
        }
    }
}

/// Apply an action to the state, returning the new state.
///
/// Total: unknown streams start from the empty state and out-of-range
/// navigation leaves the selection alone.
pub fn reduce(
    mut state: StreamsState,
    action: &StreamAction,
    config: &StreamStoreConfig,
) -> StreamsState {
    match action {
        StreamAction::PageRequested { stream_key } => {
            state.stream_mut(stream_key).is_requesting = true;
        }

        StreamAction::PageReceived {
            stream_key,
            posts,
            page_handle,
        } => {
            let stream = state.stream_mut(stream_key);
            append_page(stream, posts);
            stream.is_requesting = false;
            if posts.is_empty() {
                stream.last_page = true;
            }
            stream.page_handle = page_handle.clone();
        }

        StreamAction::UpdatesReceived {
            stream_key,
            post_keys,
        } => {
            let stream = state.stream_mut(stream_key);
            prepend_pending(stream, post_keys, config.max_pending_items);
        }

        StreamAction::ShowUpdates { stream_key } => {
            let stream = state.stream_mut(stream_key);
            if !stream.pending_items.is_empty() {
                let pending = std::mem::take(&mut stream.pending_items);
                let items = std::mem::take(&mut stream.items);
                stream.items = unique_keys(pending.into_iter().chain(items));
            }
        }

        StreamAction::ItemSelected {
            stream_key,
            post_key,
        } => {
            state.stream_mut(stream_key).selected = Some(post_key.clone());
            state.current_stream = Some(stream_key.clone());
        }

        StreamAction::SelectNextItem { stream_key, items } => {
            move_selection(&mut state, stream_key, items, 1);
        }

        StreamAction::SelectPrevItem { stream_key, items } => {
            move_selection(&mut state, stream_key, items, -1);
        }

        StreamAction::SelectFirstItem { stream_key, items } => {
            state.current_stream = Some(stream_key.clone());
            if let Some(first) = items.first() {
                state.stream_mut(stream_key).selected = Some(first.clone());
            }
        }

        StreamAction::CardExpanded { post_key } => {
            state.card_expansions.insert(post_key.to_key_string());
        }

        StreamAction::CardCollapsed { post_key } => {
            state.card_expansions.remove(&post_key.to_key_string());
        }

        StreamAction::CardExpansionsReset => {
            state.card_expansions.clear();
        }
    }

    state
}

fn append_page(stream: &mut StreamState, posts: &[PostKey]) {
    let before = stream.items.len() + posts.len();
    let items = std::mem::take(&mut stream.items);
    stream.items = unique_keys(items.into_iter().chain(posts.iter().cloned()));

    let dropped = before - stream.items.len();
    if dropped > 0 {
        trace!(dropped, "Dropped duplicate posts from page");
    }
}

fn prepend_pending(stream: &mut StreamState, post_keys: &[PostKey], limit: usize) {
    let existing: HashSet<String> = stream
        .pending_items
        .iter()
        .map(PostKey::to_key_string)
        .collect();

    let fresh = post_keys
        .iter()
        .filter(|key| !existing.contains(&key.to_key_string()))
        .cloned();
    let pending = std::mem::take(&mut stream.pending_items);
    let mut merged = unique_keys(fresh.chain(pending));

    if merged.len() > limit {
        trace!(
            dropped = merged.len() - limit,
            "Pending updates over limit, dropping oldest"
        );
        merged.truncate(limit);
    }
    stream.pending_items = merged;
}

/// Navigation always makes `stream_key` the current stream, even when the
/// selection cannot move.
fn move_selection(state: &mut StreamsState, stream_key: &str, items: &[PostKey], offset: isize) {
    state.current_stream = Some(stream_key.to_string());

    let stream = state.stream_mut(stream_key);
    let Some(selected) = stream.selected.as_ref() else {
        trace!(stream_key, "No selection to move");
        return;
    };

    let Some(index) = items.iter().position(|item| item == selected) else {
        trace!(stream_key, "Selected item is not visible");
        return;
    };

    match index.checked_add_signed(offset).and_then(|i| items.get(i)) {
        Some(next) => stream.selected = Some(next.clone()),
        None => trace!(stream_key, index, "Selection already at boundary"),
    }
}
