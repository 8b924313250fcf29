//! Partial-update submission

use anyhow::Result;
use async_trait::async_trait;
use cg_core::{ChangeSet, EntityId, EntityKind, Record};
use hydrate::FetchResponse;

/// Backend endpoint receiving PATCH-style partial updates
#[async_trait]
pub trait UpdateSink: Send + Sync {
    async fn patch(
        &self,
        kind: &EntityKind,
        id: &EntityId,
        payload: &ChangeSet,
    ) -> Result<FetchResponse>;
}

/// Result of submitting one edit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing meaningful changed; the backend was not called
    NoChanges {
        /// Fields the user emptied, which this path cannot submit
        ignored_clears: Vec<String>,
    },
    /// The backend accepted the payload and the cached entity was invalidated
    Applied {
        payload: ChangeSet,
        ignored_clears: Vec<String>,
        /// Updated entity, if the backend echoed it back
        entity: Option<Record>,
    },
    /// The backend answered with `success: false`
    Rejected { message: Option<String> },
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SubmitOutcome::Applied { .. })
    }

    /// Short notice suitable for a toast or status line
    pub fn notice(&self) -> String {
        match self {
            SubmitOutcome::NoChanges { .. } => "No changes to submit".to_string(),
            SubmitOutcome::Applied { payload, .. } => {
                format!("Updated {} field(s)", payload.len())
            }
            SubmitOutcome::Rejected { message } => match message {
                Some(message) => format!("Update rejected: {}", message),
                None => "Update rejected".to_string(),
            },
        }
    }
}
