//! Reader stream state.
//!
//! Each stream is an ordered list of post keys with pagination, pending
//! background updates and a keyboard selection. State changes go through
//! the pure [`reduce`] function; reads go through the selector functions.
//!
//! # Example
//!
//! ```ignore
//! let config = StreamStoreConfig::default();
//! let state = reduce(StreamsState::new(), &StreamAction::PageRequested {
//!     stream_key: "following".into(),
//! }, &config);
//!
//! assert!(get_stream(&state, "following").is_requesting);
//! ```

mod config;
mod reducer;
mod selectors;
mod state;

pub use config::StreamStoreConfig;
pub use reducer::{reduce, StreamAction};
pub use selectors::{
    get_adjacent_item, get_current_stream, get_next_item, get_previous_item, get_stream,
    get_update_count, is_card_expanded,
};
pub use state::{StreamState, StreamsState};
