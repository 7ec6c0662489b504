//! Retrieval of stored submissions: the listing view and single-record
//! lookups backing the post-analysis navigation target.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::submission::{submission_key, SubmissionRecord, SUBMISSION_KEY_PREFIX};
use crate::storage::kv::{KvError, KvStore};

/// Upload entry point advertised alongside the empty state.
pub const UPLOAD_PATH: &str = "/api/v1/submissions";

#[derive(Debug, Clone, Serialize)]
pub struct EmptyState {
    pub message: String,
    pub upload_path: String,
}

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub submissions: Vec<SubmissionRecord>,
    /// Present only when no submissions exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
}

/// Loads every submission record under the `resume:` prefix. A stored value
/// that no longer decodes is skipped with a warning instead of blanking the
/// whole view.
pub async fn load_listing(kv: &dyn KvStore) -> Result<ListingView, KvError> {
    let items = kv.list(SUBMISSION_KEY_PREFIX, true).await?;

    let mut submissions = Vec::with_capacity(items.len());
    for item in items {
        let Some(value) = item.value else { continue };
        match SubmissionRecord::from_blob(&value) {
            Ok(record) => submissions.push(record),
            Err(error) => {
                warn!(key = %item.key, %error, "skipping undecodable submission record")
            }
        }
    }

    let empty_state = submissions.is_empty().then(|| EmptyState {
        message: "No resumes found".to_string(),
        upload_path: UPLOAD_PATH.to_string(),
    });

    Ok(ListingView { submissions, empty_state })
}

/// Loads one submission by identifier. An undecodable stored value is treated
/// the same as a missing one.
pub async fn load_submission(
    kv: &dyn KvStore,
    id: Uuid,
) -> Result<Option<SubmissionRecord>, KvError> {
    let Some(blob) = kv.get(&submission_key(id)).await? else {
        return Ok(None);
    };
    match SubmissionRecord::from_blob(&blob) {
        Ok(record) => Ok(Some(record)),
        Err(error) => {
            warn!(submission = %id, %error, "stored submission record is undecodable");
            Ok(None)
        }
    }
}
