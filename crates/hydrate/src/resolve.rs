//! Relation resolution
//!
//! Resolves the foreign keys of a page of records into view models:
//! - Distinct ids per kind are fetched at most once per stage
//! - Cached ids are never refetched until invalidated
//! - Fetches within a stage run concurrently; stages run in order
//! - Failed fetches are logged and skipped, never propagated

use crate::cache::CacheRegistry;
use crate::extractor::{RelationExtractor, RelationPlan, RelationSpec};
use crate::fetch::{EntityFetcher, FetchResponse};
use crate::view::{Relation, ViewModel};
use ahash::{AHashMap, AHashSet};
use cg_core::{EntityId, EntityKind, Record};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cumulative hydration counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HydrationStats {
    /// Fetch-by-id calls issued
    pub fetches_issued: u64,
    /// Distinct referenced ids served from cache
    pub cache_hits: u64,
    /// Fetches that failed or returned no entity
    pub soft_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    fetches_issued: AtomicU64,
    cache_hits: AtomicU64,
    soft_failures: AtomicU64,
}

/// Pending fetches for one entity kind within a stage
struct KindBatch {
    kind: EntityKind,
    fetcher: Arc<dyn EntityFetcher>,
    referenced: Vec<EntityId>,
    seen: AHashSet<EntityId>,
}

/// Resolves relations against a session-scoped cache
///
/// Create one per list view and drop it with the view; the cache lives
/// exactly as long as the hydrator.
#[derive(Debug, Default)]
pub struct Hydrator {
    caches: CacheRegistry,
    counters: Counters,
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Join `records` with the relations described by `extractors`
    ///
    /// Extractors are applied in declaration order; an extractor reading
    /// `through` another relation waits for that relation's stage to settle.
    /// Only malformed extractor configuration is an error.
    pub async fn resolve_relations(
        &self,
        records: Vec<Record>,
        extractors: &[RelationExtractor],
    ) -> crate::Result<Vec<ViewModel>> {
        let plan = RelationPlan::build(extractors.iter().map(RelationExtractor::spec))?;
        let mut views: Vec<ViewModel> = records.into_iter().map(ViewModel::new).collect();

        for (stage_index, stage) in plan.stages().iter().enumerate() {
            let stage_extractors: Vec<&RelationExtractor> =
                stage.iter().map(|&index| &extractors[index]).collect();

            self.fetch_stage(stage_index, &stage_extractors, &views).await;

            for extractor in &stage_extractors {
                self.attach(extractor, &mut views);
            }
        }

        Ok(views)
    }

    /// Remove one entity from its kind's cache
    ///
    /// Call after any create, update or delete touching an entity that
    /// relations may reference.
    pub fn invalidate(&self, kind: &EntityKind, id: &EntityId) -> bool {
        let removed = self.caches.invalidate(kind, id);
        if removed {
            debug!("Invalidated {} {}", kind, id);
        }
        removed
    }

    /// Refetch one entity and overwrite its cache entry
    ///
    /// A soft miss removes the entry instead.
    pub async fn refresh(
        &self,
        kind: &EntityKind,
        id: &EntityId,
        fetcher: &dyn EntityFetcher,
    ) -> Option<Arc<Record>> {
        self.counters.fetches_issued.fetch_add(1, Ordering::Relaxed);
        let outcome = fetcher.fetch(id).await;
        let stored = self.store(kind, id, outcome);
        if stored.is_none() {
            self.caches.invalidate(kind, id);
        }
        stored
    }

    /// Drop every cached entity
    pub fn clear(&self) {
        self.caches.clear();
    }

    pub fn stats(&self) -> HydrationStats {
        HydrationStats {
            fetches_issued: self.counters.fetches_issued.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            soft_failures: self.counters.soft_failures.load(Ordering::Relaxed),
        }
    }

    /// Fetch every uncached id referenced by one stage
    ///
    /// Ids are grouped per kind so extractors sharing a kind share fetches;
    /// the first extractor of a kind provides the fetcher.
    async fn fetch_stage(
        &self,
        stage_index: usize,
        extractors: &[&RelationExtractor],
        views: &[ViewModel],
    ) {
        let mut batches: Vec<KindBatch> = Vec::new();
        let mut batch_of: AHashMap<EntityKind, usize> = AHashMap::new();

        for extractor in extractors {
            let slot = *batch_of.entry(extractor.kind().clone()).or_insert_with(|| {
                batches.push(KindBatch {
                    kind: extractor.kind().clone(),
                    fetcher: Arc::clone(extractor.fetcher()),
                    referenced: Vec::new(),
                    seen: AHashSet::new(),
                });
                batches.len() - 1
            });
            let batch = &mut batches[slot];

            for view in views {
                for id in referenced_ids(view, extractor.spec()).0 {
                    if batch.seen.insert(id.clone()) {
                        batch.referenced.push(id);
                    }
                }
            }
        }

        let mut pending = Vec::new();
        for batch in &batches {
            let cache = self.caches.cache_for(&batch.kind);
            let missing = cache.missing(&batch.referenced);
            let hits = batch.referenced.len() - missing.len();

            self.counters.cache_hits.fetch_add(hits as u64, Ordering::Relaxed);
            debug!(
                "Stage {}: {} referenced {} ({} cached, {} to fetch)",
                stage_index,
                batch.referenced.len(),
                batch.kind,
                hits,
                missing.len()
            );

            for id in missing {
                pending.push((&batch.kind, Arc::clone(&batch.fetcher), id));
            }
        }

        if pending.is_empty() {
            return;
        }

        self.counters
            .fetches_issued
            .fetch_add(pending.len() as u64, Ordering::Relaxed);

        let fetches = pending.into_iter().map(|(kind, fetcher, id)| async move {
            let outcome = fetcher.fetch(&id).await;
            self.store(kind, &id, outcome);
        });
        join_all(fetches).await;
    }

    /// Record one fetch outcome, returning the cached entity on success
    fn store(
        &self,
        kind: &EntityKind,
        id: &EntityId,
        outcome: anyhow::Result<FetchResponse>,
    ) -> Option<Arc<Record>> {
        match outcome {
            Ok(FetchResponse {
                success: true,
                data: Some(entity),
                ..
            }) => {
                let entity = Arc::new(entity);
                self.caches
                    .cache_for(kind)
                    .insert(id.clone(), Arc::clone(&entity));
                Some(entity)
            }
            Ok(response) => {
                self.counters.soft_failures.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "No {} {} available: {}",
                    kind,
                    id,
                    response.message.as_deref().unwrap_or("empty response")
                );
                None
            }
            Err(e) => {
                self.counters.soft_failures.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to fetch {} {}: {:#}", kind, id, e);
                None
            }
        }
    }

    /// Populate one relation field on every view model from the cache
    fn attach(&self, extractor: &RelationExtractor, views: &mut [ViewModel]) {
        let cache = self.caches.cache_for(extractor.kind());

        for view in views.iter_mut() {
            let (ids, many) = referenced_ids(view, extractor.spec());
            if ids.is_empty() {
                continue;
            }

            let mut found: Vec<Arc<Record>> = ids.iter().filter_map(|id| cache.get(id)).collect();

            let relation = if many {
                if found.is_empty() {
                    continue;
                }
                Relation::Many(found)
            } else {
                match found.pop() {
                    Some(entity) => Relation::One(entity),
                    None => continue,
                }
            };

            view.set_relation(extractor.field(), relation);
        }
    }
}

/// Ids a view model references for one relation
///
/// The flag is true when the relation resolves to many entities: the key
/// holds an array, or it is read through a `Many` relation.
fn referenced_ids(view: &ViewModel, spec: &RelationSpec) -> (Vec<EntityId>, bool) {
    let (values, through_many): (Vec<&Value>, bool) = match spec.through.as_deref() {
        None => (view.record().get(&spec.foreign_key).into_iter().collect(), false),
        Some(source) => match view.relation(source) {
            Some(relation) => (
                relation
                    .entities()
                    .filter_map(|entity| entity.get(&spec.foreign_key))
                    .collect(),
                relation.is_many(),
            ),
            None => (Vec::new(), false),
        },
    };

    let many = through_many || values.iter().any(|value| value.is_array());
    let ids = values.into_iter().flat_map(EntityId::collect_from).collect();
    (ids, many)
}
