//! Read-only queries over a `StreamsState` snapshot.

use crate::types::PostKey;

use super::state::{StreamState, StreamsState};

/// Stream state for `stream_key`, or the empty stream when absent.
pub fn get_stream<'a>(state: &'a StreamsState, stream_key: &str) -> &'a StreamState {
    state
        .by_key
        .get(stream_key)
        .unwrap_or_else(|| StreamState::empty())
}

/// Last stream touched by a selection event.
pub fn get_current_stream(state: &StreamsState) -> Option<&str> {
    state.current_stream.as_deref()
}

/// Item `direction` steps away from `current_item` in the current stream.
pub fn get_adjacent_item<'a>(
    state: &'a StreamsState,
    current_item: &PostKey,
    direction: isize,
) -> Option<&'a PostKey> {
    let stream = get_stream(state, get_current_stream(state)?);
    let index = stream.items.iter().position(|item| item == current_item)?;
    index
        .checked_add_signed(direction)
        .and_then(|i| stream.items.get(i))
}

pub fn get_next_item<'a>(state: &'a StreamsState, current_item: &PostKey) -> Option<&'a PostKey> {
    get_adjacent_item(state, current_item, 1)
}

pub fn get_previous_item<'a>(
    state: &'a StreamsState,
    current_item: &PostKey,
) -> Option<&'a PostKey> {
    get_adjacent_item(state, current_item, -1)
}

/// Number of pending updates waiting to be shown.
pub fn get_update_count(state: &StreamsState, stream_key: &str) -> usize {
    get_stream(state, stream_key).update_count()
}

pub fn is_card_expanded(state: &StreamsState, post_key: &PostKey) -> bool {
    state.card_expansions.contains(&post_key.to_key_string())
}
