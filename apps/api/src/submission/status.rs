//! Observable status projection of a running analysis.
//!
//! The pipeline pushes one status per step transition into an unbounded
//! channel; whoever owns the receiver decides how to surface them. Emission
//! is best-effort: a dropped receiver must never fail an analysis.

use std::fmt;

use tokio::sync::mpsc;
use uuid::Uuid;

/// Sender half of the status projection.
pub type StatusSender = mpsc::UnboundedSender<PipelineStatus>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    UploadingResume,
    RenderingPreview,
    UploadingPreview,
    SavingSubmission,
    Analyzing,
    /// Terminal success; carries the submission to navigate to.
    Complete { id: Uuid },
    /// Terminal failure; carries the human-readable error text.
    Failed { message: String },
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::UploadingResume => write!(f, "Uploading the file..."),
            PipelineStatus::RenderingPreview => write!(f, "Converting to image..."),
            PipelineStatus::UploadingPreview => write!(f, "Uploading the image..."),
            PipelineStatus::SavingSubmission => write!(f, "Preparing data..."),
            PipelineStatus::Analyzing => write!(f, "Analyzing..."),
            PipelineStatus::Complete { .. } => write!(f, "Analysis complete, redirecting..."),
            PipelineStatus::Failed { message } => write!(f, "{message}"),
        }
    }
}

/// Best-effort emit.
pub(crate) fn emit(progress: &StatusSender, status: PipelineStatus) {
    let _ = progress.send(status);
}
