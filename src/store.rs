//! Main StreamStore struct tying reducer, selectors and subscriptions together.

use crate::error::{Result, StreamError};
use crate::streams::{self, reduce, StreamAction, StreamState, StreamsState};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
use crate::types::{unique_keys, PostKey};
use parking_lot::RwLock;
use tracing::{debug, warn};

pub use crate::streams::StreamStoreConfig;

/// Owner of one [`StreamsState`] value.
///
/// Dispatches are serialized by a write lock, so every action sees the
/// result of the previous one. Reads share a read lock.
pub struct StreamStore {
    config: StreamStoreConfig,

    state: RwLock<StreamsState>,

    subscriptions: SubscriptionManager,
}

impl StreamStore {
    pub fn new(config: StreamStoreConfig) -> Result<Self> {
        Self::with_state(config, StreamsState::new())
    }

    /// Create a store seeded with an existing state.
    pub fn with_state(config: StreamStoreConfig, state: StreamsState) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(state),
            subscriptions: SubscriptionManager::new(),
        })
    }

    /// Restore a store from [`StreamStore::snapshot_json`] output.
    ///
    /// Item lists are re-deduplicated and pending lists trimmed to the
    /// configured limit, so a hand-edited snapshot cannot break them.
    pub fn from_snapshot_json(
        value: serde_json::Value,
        config: StreamStoreConfig,
    ) -> Result<Self> {
        let mut state: StreamsState = serde_json::from_value(value)
            .map_err(|e| StreamError::Deserialization(e.to_string()))?;

        for (stream_key, stream) in state.by_key.iter_mut() {
            let (items, pending) = (stream.items.len(), stream.pending_items.len());
            stream.items = unique_keys(std::mem::take(&mut stream.items));
            stream.pending_items = unique_keys(std::mem::take(&mut stream.pending_items));
            stream.pending_items.truncate(config.max_pending_items);

            if stream.items.len() != items || stream.pending_items.len() != pending {
                warn!(stream_key = %stream_key, "Repaired stream lists from snapshot");
            }
        }

        Self::with_state(config, state)
    }

    pub fn config(&self) -> &StreamStoreConfig {
        &self.config
    }

    /// Apply an action and notify matching subscribers.
    pub fn dispatch(&self, action: StreamAction) {
        debug!(
            action = action.kind(),
            stream_key = action.stream_key().unwrap_or("-"),
            "Dispatching stream action"
        );

        let mut state = self.state.write();
        let previous = std::mem::take(&mut *state);
        *state = reduce(previous, &action, &self.config);

        match &action {
            StreamAction::CardExpanded { post_key } => {
                self.subscriptions.broadcast_card_toggled(post_key, true);
            }
            StreamAction::CardCollapsed { post_key } => {
                self.subscriptions.broadcast_card_toggled(post_key, false);
            }
            StreamAction::CardExpansionsReset => {
                self.subscriptions.broadcast_card_expansions_reset();
            }
            _ => {
                if let Some(stream_key) = action.stream_key() {
                    self.subscriptions.broadcast_stream_changed(
                        stream_key,
                        action.kind(),
                        streams::get_stream(&state, stream_key),
                        streams::get_current_stream(&state),
                    );
                }
            }
        }
    }

    /// Apply several actions in order.
    pub fn dispatch_all<I>(&self, actions: I)
    where
        I: IntoIterator<Item = StreamAction>,
    {
        for action in actions {
            self.dispatch(action);
        }
    }

    // --- Reads ---

    /// Clone of the whole state.
    pub fn state(&self) -> StreamsState {
        self.state.read().clone()
    }

    /// Run a closure over the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&StreamsState) -> R) -> R {
        f(&*self.state.read())
    }

    /// Clone of one stream's state (empty when absent).
    pub fn stream(&self, stream_key: &str) -> StreamState {
        self.read(|state| streams::get_stream(state, stream_key).clone())
    }

    pub fn current_stream(&self) -> Option<String> {
        self.read(|state| streams::get_current_stream(state).map(str::to_string))
    }

    pub fn adjacent_item(&self, current_item: &PostKey, direction: isize) -> Option<PostKey> {
        self.read(|state| streams::get_adjacent_item(state, current_item, direction).cloned())
    }

    pub fn update_count(&self, stream_key: &str) -> usize {
        self.read(|state| streams::get_update_count(state, stream_key))
    }

    pub fn is_card_expanded(&self, post_key: &PostKey) -> bool {
        self.read(|state| streams::is_card_expanded(state, post_key))
    }

    /// Serialize the whole state to JSON.
    pub fn snapshot_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&*self.state.read())?)
    }

    // --- Subscriptions ---

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Subscribe with the store's default buffer size.
    pub fn subscribe_filtered(&self, filter: SubscriptionFilter) -> SubscriptionHandle {
        self.subscriptions.subscribe(SubscriptionConfig {
            buffer_size: self.config.subscription_buffer_size,
            filter,
        })
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::StreamEvent;
    use crate::types::PageHandle;

    #[test]
    fn test_config_validation() {
        assert!(StreamStoreConfig::default().validate().is_ok());

        let config = StreamStoreConfig {
            max_pending_items: 0,
            ..Default::default()
        };
        assert!(matches!(
            StreamStore::new(config),
            Err(StreamError::InvalidConfig(_))
        ));

        let config = StreamStoreConfig {
            subscription_buffer_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StreamError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_dispatch_and_read() {
        let store = StreamStore::new(StreamStoreConfig::default()).unwrap();
        store.dispatch(StreamAction::PageRequested {
            stream_key: "following".into(),
        });
        assert!(store.stream("following").is_requesting);
        assert!(!store.stream("other").is_requesting);
        assert_eq!(store.current_stream(), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let store = StreamStore::new(StreamStoreConfig::default()).unwrap();
        store.dispatch_all([
            StreamAction::PageReceived {
                stream_key: "following".into(),
                posts: vec![PostKey::blog(1, 2), PostKey::feed(3, 4)],
                page_handle: None,
            },
            StreamAction::ItemSelected {
                stream_key: "following".into(),
                post_key: PostKey::feed(3, 4),
            },
            StreamAction::CardExpanded {
                post_key: PostKey::blog(1, 2),
            },
        ]);

        let snapshot = store.snapshot_json().unwrap();
        let restored =
            StreamStore::from_snapshot_json(snapshot, StreamStoreConfig::default()).unwrap();
        assert_eq!(restored.state(), store.state());
    }

    #[test]
    fn test_restore_invalid_snapshot() {
        let result = StreamStore::from_snapshot_json(
            serde_json::json!({"by_key": 5}),
            StreamStoreConfig::default(),
        );
        assert!(matches!(result, Err(StreamError::Deserialization(_))));
    }

    #[test]
    fn test_restore_repairs_duplicate_lists() {
        let key = serde_json::json!({"kind": "blog", "post_id": 1, "blog_id": 2});
        let other = serde_json::json!({"kind": "blog", "post_id": 3, "blog_id": 2});
        let snapshot = serde_json::json!({
            "by_key": {
                "following": {
                    "items": [key, other, key],
                    "pending_items": [other, other, key],
                    "selected": null,
                    "last_page": false,
                    "is_requesting": false
                }
            },
            "current_stream": null,
            "card_expansions": []
        });

        let config = StreamStoreConfig {
            max_pending_items: 1,
            ..Default::default()
        };
        let store = StreamStore::from_snapshot_json(snapshot, config).unwrap();
        let stream = store.stream("following");
        assert_eq!(stream.items, vec![PostKey::blog(1, 2), PostKey::blog(3, 2)]);
        assert_eq!(stream.pending_items, vec![PostKey::blog(3, 2)]);
        assert_eq!(stream.page_handle, None);
    }

    #[test]
    fn test_null_page_handle_survives_snapshot() {
        let store = StreamStore::new(StreamStoreConfig::default()).unwrap();
        store.dispatch(StreamAction::PageReceived {
            stream_key: "following".into(),
            posts: vec![PostKey::blog(1, 2)],
            page_handle: Some(PageHandle(serde_json::Value::Null)),
        });

        let snapshot = store.snapshot_json().unwrap();
        let restored =
            StreamStore::from_snapshot_json(snapshot, StreamStoreConfig::default()).unwrap();
        assert_eq!(
            restored.stream("following").page_handle,
            Some(PageHandle(serde_json::Value::Null))
        );
    }

    #[test]
    fn test_card_expansions_reset_is_broadcast() {
        let store = StreamStore::new(StreamStoreConfig::default()).unwrap();
        let handle = store.subscribe_filtered(SubscriptionFilter::cards());

        store.dispatch(StreamAction::CardExpanded {
            post_key: PostKey::blog(1, 2),
        });
        store.dispatch(StreamAction::CardExpansionsReset);

        assert!(!store.is_card_expanded(&PostKey::blog(1, 2)));
        let events: Vec<StreamEvent> = handle.receiver.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], StreamEvent::CardExpansionsReset));
    }
}
