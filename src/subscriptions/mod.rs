//! In-process notifications of stream changes.
//!
//! Subscribers receive a [`StreamEvent`] after every dispatched action that
//! matches their filter. Buffers are bounded; a subscriber that falls behind
//! is dropped.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::streams(vec!["following".to_string()]),
//!     ..Default::default()
//! });
//!
//! loop {
//!     match handle.recv() {
//!         Ok(StreamEvent::StreamChanged { stream, .. }) => {
//!             println!("{} items", stream.item_count)
//!         }
//!         Ok(StreamEvent::Dropped { .. }) | Err(_) => break,
//!         Ok(_) => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StreamEvent, StreamSummary, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId,
};
