//! Session errors

use hydrate::HydrateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The primary page fetch failed; nothing was hydrated
    #[error("failed to load page")]
    PageFetch(#[source] anyhow::Error),

    /// The session's relation extractors are malformed
    #[error("invalid relation configuration")]
    Hydrate(#[from] HydrateError),

    /// The update request itself failed (transport, decoding)
    #[error("failed to submit update")]
    Submit(#[source] anyhow::Error),
}
