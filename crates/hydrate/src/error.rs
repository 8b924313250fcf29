//! Hydration errors
//!
//! Only malformed extractor configuration is an error. Failed relation
//! fetches are soft misses and never surface here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HydrateError {
    #[error("relation #{index} has an empty `{attribute}`")]
    EmptyAttribute {
        index: usize,
        attribute: &'static str,
    },

    #[error("relation field `{field}` is declared more than once")]
    DuplicateField { field: String },

    #[error("relation `{field}` reads through `{through}`, which no earlier relation declares")]
    UnknownSource { field: String, through: String },
}
