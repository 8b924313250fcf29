//! List session: page loads and edits against one hydration cache

use crate::error::SessionError;
use crate::page::{LoadedPage, PageQuery, PageSource};
use crate::submit::{SubmitOutcome, UpdateSink};
use cg_core::{cleared_fields, ChangeSet, EntityId, EntityKind, Record};
use hydrate::{Hydrator, RelationExtractor, RelationPlan};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Identifies one page load
///
/// Only the most recently issued ticket is current; results of older loads
/// should be discarded by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// State behind one list view
pub struct ListSession<S> {
    /// Primary record source
    source: S,
    /// Relations joined onto every page
    extractors: Vec<RelationExtractor>,
    /// Session-scoped relation cache
    hydrator: Hydrator,
    /// Monotonic load counter
    generation: AtomicU64,
    /// Query of the most recent load
    query: RwLock<PageQuery>,
}

impl<S: PageSource> ListSession<S> {
    /// Create a session; extractors are validated up front
    pub fn new(source: S, extractors: Vec<RelationExtractor>) -> crate::Result<Self> {
        RelationPlan::build(extractors.iter().map(RelationExtractor::spec))?;

        Ok(Self {
            source,
            extractors,
            hydrator: Hydrator::new(),
            generation: AtomicU64::new(0),
            query: RwLock::new(PageQuery::default()),
        })
    }

    /// Query of the most recent load
    pub fn query(&self) -> PageQuery {
        self.query.read().clone()
    }

    pub fn hydrator(&self) -> &Hydrator {
        &self.hydrator
    }

    /// Fetch and hydrate one page
    ///
    /// A failed primary fetch fails the whole load. Failed relation fetches
    /// only leave relation fields unresolved.
    pub async fn load(&self, query: PageQuery) -> crate::Result<LoadedPage> {
        let page_size = query.page_size;
        let ticket = self.begin(query.clone());

        let mut page = self
            .source
            .fetch_page(&query)
            .await
            .map_err(SessionError::PageFetch)?;

        let records = std::mem::take(&mut page.items);
        debug!(
            "Loaded page {} ({} records, generation {})",
            page.page,
            records.len(),
            ticket.generation()
        );

        let items = self
            .hydrator
            .resolve_relations(records, &self.extractors)
            .await?;

        Ok(LoadedPage::new(ticket, page, items, page_size))
    }

    /// Load the current query again
    pub async fn reload(&self) -> crate::Result<LoadedPage> {
        self.load(self.query()).await
    }

    /// Check whether a load is still the latest one
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Reduce an edit to its payload and submit it
    ///
    /// Empty payloads never reach the backend. A successful submit
    /// invalidates the edited entity so the next load refetches it.
    pub async fn submit_update(
        &self,
        sink: &dyn UpdateSink,
        kind: &EntityKind,
        id: &EntityId,
        original: &Record,
        updated: &Record,
    ) -> crate::Result<SubmitOutcome> {
        let payload = ChangeSet::between(original, updated);
        let ignored_clears = cleared_fields(original, updated);

        if payload.is_empty() {
            debug!("No changes for {} {}, skipping update", kind, id);
            return Ok(SubmitOutcome::NoChanges { ignored_clears });
        }

        info!("Submitting {} changed field(s) for {} {}", payload.len(), kind, id);

        let response = sink
            .patch(kind, id, &payload)
            .await
            .map_err(SessionError::Submit)?;

        if !response.success {
            return Ok(SubmitOutcome::Rejected {
                message: response.message,
            });
        }

        self.hydrator.invalidate(kind, id);

        Ok(SubmitOutcome::Applied {
            payload,
            ignored_clears,
            entity: response.data,
        })
    }

    /// Forget a cached entity after a create or delete
    pub fn notify_mutation(&self, kind: &EntityKind, id: &EntityId) -> bool {
        self.hydrator.invalidate(kind, id)
    }

    fn begin(&self, query: PageQuery) -> LoadTicket {
        *self.query.write() = query;
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
