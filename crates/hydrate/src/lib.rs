//! Relational hydration for paginated records
//!
//! This crate provides:
//! - Per-kind entity caches scoped to one list-viewing session
//! - Relation extractors (foreign key -> fetch-by-id), including
//!   transitive joins through earlier relations
//! - Deduplicated, concurrent resolution with fail-open fetch handling
//! - View models joining records with their resolved relations

pub mod cache;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod resolve;
pub mod view;

// Re-exports
pub use cache::{CacheRegistry, EntityCache, RecordCache};
pub use cg_core::{EntityId, EntityKind, Record};
pub use error::HydrateError;
pub use extractor::{RelationExtractor, RelationPlan, RelationSpec};
pub use fetch::{fetch_fn, EntityFetcher, FetchResponse, FnFetcher};
pub use resolve::{HydrationStats, Hydrator};
pub use view::{Relation, ViewModel};

/// Result type for hydration operations
pub type Result<T> = std::result::Result<T, HydrateError>;
