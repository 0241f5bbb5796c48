//! Tag-based query cache.
//!
//! Every cached response carries a set of [`Tag`]s: one per entity id it
//! contains plus, for list responses, the collection-level `LIST` tag.
//! Mutations name the tags they invalidate; matching entries turn stale and
//! the ones currently shown on screen are handed back for an immediate
//! refetch. Callers never track which screen depends on which write.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::transport::ApiRequest;

/// Cache label. The `&'static str` is the resource tag type, e.g. `"Zone"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Every list query of the resource.
    List(&'static str),
    /// Anything holding the entity with this id.
    Id(&'static str, i32),
}

/// How a get-by-id endpoint wraps its entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Envelope {
    /// The entity is the body.
    Bare,
    /// The entity sits under `data`.
    Data,
}

/// Shape of a cached query, needed to normalize and re-tag a refetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    List { tag: &'static str },
    Item {
        tag: &'static str,
        id: i32,
        envelope: Envelope,
    },
}

impl QueryKind {
    /// Tags for an already normalized response of this kind.
    pub fn tags_for(&self, value: &Value) -> Vec<Tag> {
        match *self {
            QueryKind::List { tag } => {
                let mut tags: Vec<Tag> = value
                    .get("data")
                    .and_then(Value::as_array)
                    .map(|rows| {
                        rows.iter()
                            .filter_map(entity_id)
                            .map(|id| Tag::Id(tag, id))
                            .collect()
                    })
                    .unwrap_or_default();
                tags.push(Tag::List(tag));
                tags
            }
            QueryKind::Item { tag, id, .. } => vec![Tag::Id(tag, id)],
        }
    }
}

/// Reads the numeric `id` field of an entity object.
pub fn entity_id(value: &Value) -> Option<i32> {
    value
        .get("id")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
}

#[derive(Debug, Clone)]
struct CacheEntry {
    request: ApiRequest,
    kind: QueryKind,
    value: Value,
    tags: HashSet<Tag>,
    stale: bool,
}

/// Query whose entry was invalidated while somebody was subscribed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Refetch {
    pub request: ApiRequest,
    pub kind: QueryKind,
}

/// In-memory store of normalized responses keyed by [`ApiRequest::cache_key`].
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, CacheEntry>,
    subscriptions: HashMap<String, usize>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key` unless it was invalidated.
    pub fn fresh(&self, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| &entry.value)
    }

    /// `Some(true)` for stale entries, `None` when nothing is cached.
    pub fn is_stale(&self, key: &str) -> Option<bool> {
        self.entries.get(key).map(|entry| entry.stale)
    }

    /// Stores a normalized response, replacing any previous entry.
    pub fn insert(&mut self, request: ApiRequest, kind: QueryKind, value: Value) {
        let tags = kind.tags_for(&value).into_iter().collect();
        let key = request.cache_key();
        log::debug!("cache store {key}");
        self.entries.insert(
            key,
            CacheEntry {
                request,
                kind,
                value,
                tags,
                stale: false,
            },
        );
    }

    /// Marks every entry holding one of `tags` stale and returns the
    /// subscribed ones that should be re-executed right away.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<Refetch> {
        let mut refetch = Vec::new();
        for (key, entry) in &mut self.entries {
            if !tags.iter().any(|tag| entry.tags.contains(tag)) {
                continue;
            }
            log::debug!("cache invalidate {key}");
            entry.stale = true;
            if self.subscriptions.get(key).copied().unwrap_or(0) > 0 {
                refetch.push(Refetch {
                    request: entry.request.clone(),
                    kind: entry.kind,
                });
            }
        }
        refetch
    }

    /// Registers interest in `key`; subscribed entries refetch eagerly.
    pub fn subscribe(&mut self, key: &str) {
        *self.subscriptions.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Releases one subscription to `key`. The entry is evicted together
    /// with the last subscription; returns whether that happened.
    pub fn unsubscribe(&mut self, key: &str) -> bool {
        let Some(count) = self.subscriptions.get_mut(key) else {
            return false;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            return false;
        }
        self.subscriptions.remove(key);
        if self.entries.remove(key).is_some() {
            log::debug!("cache evict {key}");
        }
        true
    }

    pub fn subscribers(&self, key: &str) -> usize {
        self.subscriptions.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
