//! Session-scoped entity caches
//!
//! Entries never expire on their own. They are overwritten by later fetches
//! and removed only through explicit invalidation.

use ahash::AHashSet;
use cg_core::{EntityId, EntityKind, Record};
use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// Cache of hydrated entities keyed by id
///
/// Safe to share between concurrent page loads; the last write for an id
/// wins.
#[derive(Debug)]
pub struct EntityCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, V>,
}

impl<K, V> EntityCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get a copy of the cached value
    pub fn get<Q>(&self, id: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Insert or overwrite an entry, returning the previous value
    pub fn insert(&self, id: K, value: V) -> Option<V> {
        self.entries.insert(id, value)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(id)
    }

    /// Remove one entry
    pub fn remove<Q>(&self, id: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(id).map(|(_, value)| value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct ids from `ids` that are not cached, in first-seen order
    pub fn missing<'a, I>(&self, ids: I) -> Vec<K>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut seen = AHashSet::new();
        ids.into_iter()
            .filter(|id| seen.insert(*id))
            .filter(|id| !self.entries.contains_key(*id))
            .cloned()
            .collect()
    }
}

impl<K, V> Default for EntityCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Cache of hydrated records for one entity kind
pub type RecordCache = EntityCache<EntityId, Arc<Record>>;

/// One record cache per entity kind, created on first use
#[derive(Debug, Default)]
pub struct CacheRegistry {
    caches: DashMap<EntityKind, Arc<RecordCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cache for `kind`, creating it if needed
    pub fn cache_for(&self, kind: &EntityKind) -> Arc<RecordCache> {
        if let Some(cache) = self.caches.get(kind) {
            return Arc::clone(cache.value());
        }
        Arc::clone(self.caches.entry(kind.clone()).or_default().value())
    }

    /// Look up one cached entity
    pub fn get(&self, kind: &EntityKind, id: &EntityId) -> Option<Arc<Record>> {
        self.caches.get(kind).and_then(|cache| cache.get(id))
    }

    /// Remove one entity from its kind's cache
    ///
    /// Returns true if an entry was removed.
    pub fn invalidate(&self, kind: &EntityKind, id: &EntityId) -> bool {
        self.caches
            .get(kind)
            .map_or(false, |cache| cache.remove(id).is_some())
    }

    /// Drop every cached entity of every kind
    pub fn clear(&self) {
        for cache in self.caches.iter() {
            cache.clear();
        }
    }

    /// Number of cached entities for `kind`
    pub fn len_of(&self, kind: &EntityKind) -> usize {
        self.caches.get(kind).map_or(0, |cache| cache.len())
    }

    /// Kinds that have a cache, sorted by name
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<_> = self.caches.iter().map(|entry| entry.key().clone()).collect();
        kinds.sort();
        kinds
    }
}
