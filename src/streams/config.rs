//! Stream store configuration.

use crate::error::{Result, StreamError};

/// Store configuration.
///
/// Lives beside the reducer because `reduce` enforces `max_pending_items`.
#[derive(Clone, Debug)]
pub struct StreamStoreConfig {
    /// Max pending updates kept per stream; oldest are dropped beyond this.
    pub max_pending_items: usize,

    /// Buffer size for subscriptions created with [`crate::StreamStore::subscribe_filtered`].
    pub subscription_buffer_size: usize,
}

impl Default for StreamStoreConfig {
    fn default() -> Self {
        Self {
            max_pending_items: 1000,
            subscription_buffer_size: 1000,
        }
    }
}

impl StreamStoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pending_items == 0 {
            return Err(StreamError::InvalidConfig(
                "max_pending_items must be greater than zero".to_string(),
            ));
        }
        if self.subscription_buffer_size == 0 {
            return Err(StreamError::InvalidConfig(
                "subscription_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
