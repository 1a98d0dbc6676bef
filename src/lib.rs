//! # Reader Streams
//!
//! Keyed, reducer-driven state for paginated reader streams.
//!
//! ## Core Concepts
//!
//! - **Post keys**: Canonical identifiers for stream items, deduplicated by key string
//! - **Streams**: Per-key item lists with pending updates, selection and pagination
//! - **Reducer**: A pure `(state, action) -> state` transition function
//! - **Selectors**: Read-only queries over a state snapshot
//! - **Store**: A lock-guarded owner of the state that dispatches actions
//!   and notifies subscribers
//!
//! ## Example
//!
//! ```ignore
//! use reader_streams::{PostKey, StreamAction, StreamStore, StreamStoreConfig};
//!
//! let store = StreamStore::new(StreamStoreConfig::default())?;
//!
//! store.dispatch(StreamAction::PageRequested { stream_key: "following".into() });
//! store.dispatch(StreamAction::PageReceived {
//!     stream_key: "following".into(),
//!     posts: vec![PostKey::blog(1, 100), PostKey::feed(7, 200)],
//!     page_handle: None,
//! });
//!
//! assert_eq!(store.stream("following").items.len(), 2);
//! ```

pub mod error;
pub mod store;
pub mod streams;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{Result, StreamError};
pub use store::{StreamStore, StreamStoreConfig};
pub use streams::{
    get_adjacent_item, get_current_stream, get_next_item, get_previous_item, get_stream,
    get_update_count, is_card_expanded, reduce, StreamAction, StreamState, StreamsState,
};
pub use subscriptions::{
    DropReason, StreamEvent, StreamSummary, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
