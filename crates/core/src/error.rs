//! Error types for record parsing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Input text was not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON document was valid but not an object
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}
