//! List-view sessions
//!
//! This crate provides:
//! - Page loading (primary fetch, then relation hydration)
//! - Stale-load detection through load tickets
//! - Partial-update submission with cache invalidation
//!
//! A `ListSession` lives as long as the list view it serves; its hydration
//! cache persists across page and filter changes within that view.

pub mod error;
pub mod page;
pub mod session;
pub mod submit;

// Re-exports
pub use error::SessionError;
pub use page::{LoadedPage, Page, PageQuery, PageSource};
pub use session::{ListSession, LoadTicket};
pub use submit::{SubmitOutcome, UpdateSink};

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
