//! Core record primitives for Concierge
//!
//! This crate provides:
//! - The generic `Record` type and typed entity identifiers
//! - Field reconciliation for partial updates (`ChangeSet`)
//! - Page-number formatting for paginated lists

pub mod error;
pub mod paginate;
pub mod reconcile;
pub mod record;

// Re-exports
pub use error::CoreError;
pub use paginate::{format_page_items, page_items, total_pages, PageItem};
pub use reconcile::{cleared_fields, get_changed_fields, remove_empty_fields, remove_empty_values, ChangeSet};
pub use record::{is_empty_value, parse_record, EntityId, EntityKind, Record};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
