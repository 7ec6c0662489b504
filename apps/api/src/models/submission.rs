//! Submission record, the single stored aggregate of the system.
//!
//! One record per analyzed resume, serialized to JSON and stored as an
//! opaque text blob in the key-value store under `resume:{uuid}`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::feedback::FeedbackReport;

/// Key-space prefix shared by every submission record.
pub const SUBMISSION_KEY_PREFIX: &str = "resume:";

/// Namespaced key-value key for a submission identifier.
pub fn submission_key(id: Uuid) -> String {
    format!("{SUBMISSION_KEY_PREFIX}{id}")
}

/// A resume submission, written twice per analysis: once with empty feedback
/// before inference starts, once with the parsed feedback after it succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    /// File-store path of the original resume document.
    pub resume_path: String,
    /// File-store path of the rendered preview image.
    pub image_path: String,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    /// `None` until analysis completes. A record that keeps `None` forever
    /// marks an attempt whose inference step failed.
    pub feedback: Option<FeedbackReport>,
}

impl SubmissionRecord {
    /// Serializes the record to its stored blob form.
    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a record from its stored blob form.
    pub fn from_blob(blob: &str) -> serde_json::Result<Self> {
        serde_json::from_str(blob)
    }
}
