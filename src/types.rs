//! Core types for reader streams.

use crate::error::{Result, StreamError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a stream (e.g. `"following"`, `"feed:1234"`).
pub type StreamKey = String;

/// Canonical identifier for an item in a stream.
///
/// Equality follows the discriminating fields only, so two keys delivered
/// by independent fetches for the same post compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostKey {
    /// A post on a hosted site.
    Blog { post_id: u64, blog_id: u64 },

    /// An item of a followed feed.
    Feed { post_id: u64, feed_id: u64 },

    /// A known hole in the stream between two timestamps (epoch millis).
    Gap { from: u64, to: u64 },
}

impl PostKey {
    pub fn blog(post_id: u64, blog_id: u64) -> Self {
        PostKey::Blog { post_id, blog_id }
    }

    pub fn feed(post_id: u64, feed_id: u64) -> Self {
        PostKey::Feed { post_id, feed_id }
    }

    pub fn gap(from: u64, to: u64) -> Self {
        PostKey::Gap { from, to }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, PostKey::Gap { .. })
    }

    /// Canonical string used for deduplication and lookups.
    pub fn to_key_string(&self) -> String {
        self.to_string()
    }

    /// Derive the key for a fetched post.
    ///
    /// Feed items win over site posts; external posts are addressed by
    /// their feed.
    pub fn from_post(post: &RawPost) -> Result<Self> {
        match (post.feed_id, post.feed_item_id, post.site_id) {
            (Some(feed_id), Some(item_id), _) => Ok(PostKey::feed(item_id, feed_id)),
            (Some(feed_id), None, _) if post.is_external => Ok(PostKey::feed(post.id, feed_id)),
            (_, _, Some(blog_id)) => Ok(PostKey::blog(post.id, blog_id)),
            _ => Err(StreamError::InvalidPost(format!(
                "post {} has neither a site nor a feed id",
                post.id
            ))),
        }
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostKey::Blog { post_id, blog_id } => write!(f, "{}-{}", post_id, blog_id),
            PostKey::Feed { post_id, feed_id } => write!(f, "feed-{}-{}", post_id, feed_id),
            PostKey::Gap { from, to } => write!(f, "gap-{}-{}", from, to),
        }
    }
}

impl fmt::Debug for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostKey({})", self)
    }
}

impl FromStr for PostKey {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StreamError::InvalidPostKey(s.to_string());
        let parts: Vec<&str> = s.split('-').collect();
        let num = |p: &str| p.parse::<u64>().map_err(|_| invalid());

        match parts.as_slice() {
            ["gap", from, to] => Ok(PostKey::gap(num(*from)?, num(*to)?)),
            ["feed", post_id, feed_id] => Ok(PostKey::feed(num(*post_id)?, num(*feed_id)?)),
            [post_id, blog_id] => Ok(PostKey::blog(num(*post_id)?, num(*blog_id)?)),
            _ => Err(invalid()),
        }
    }
}

/// Keep the first occurrence of every canonical key, preserving order.
pub fn unique_keys<I>(keys: I) -> Vec<PostKey>
where
    I: IntoIterator<Item = PostKey>,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.to_key_string()))
        .collect()
}

/// The fields of a fetched post needed to derive its key.
///
/// Field names follow the API payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    #[serde(rename = "ID")]
    pub id: u64,

    #[serde(rename = "site_ID", default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u64>,

    #[serde(rename = "feed_ID", default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<u64>,

    #[serde(rename = "feed_item_ID", default, skip_serializing_if = "Option::is_none")]
    pub feed_item_id: Option<u64>,

    #[serde(default)]
    pub is_external: bool,
}

impl RawPost {
    /// A post on a hosted site.
    pub fn site(id: u64, site_id: u64) -> Self {
        Self {
            id,
            site_id: Some(site_id),
            feed_id: None,
            feed_item_id: None,
            is_external: false,
        }
    }

    /// An item of a followed feed.
    pub fn feed_item(feed_item_id: u64, feed_id: u64) -> Self {
        Self {
            id: feed_item_id,
            site_id: None,
            feed_id: Some(feed_id),
            feed_item_id: Some(feed_item_id),
            is_external: false,
        }
    }

    /// Parse a list of posts from a JSON payload.
    pub fn list_from_json(value: serde_json::Value) -> Result<Vec<Self>> {
        serde_json::from_value(value).map_err(|e| StreamError::Deserialization(e.to_string()))
    }
}

/// Opaque cursor returned by a page fetch, passed back to fetch the next page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageHandle(pub serde_json::Value);

/// Deserialize a present `page_handle` field as `Some`, even when it is `null`.
///
/// Paired with `skip_serializing_if = "Option::is_none"`, so an absent field
/// is `None` and `Some(PageHandle(Null))` survives a round trip.
pub(crate) fn deserialize_page_handle<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PageHandle>, D::Error>
where
    D: Deserializer<'de>,
{
    PageHandle::deserialize(deserializer).map(Some)
}
