//! Analysis pipeline driving one resume submission end to end.
//!
//! Flow:
//! 1. Upload the resume document to the file store
//! 2. Render the first page as a PNG preview
//! 3. Upload the preview image
//! 4. Persist the submission record with empty feedback
//! 5. Call the inference service and parse its output
//! 6. Overwrite the record with feedback attached
//!
//! Steps run strictly in order and every failure is terminal for the attempt:
//! no retries, and no rollback of side effects already taken. A record
//! written in step 4 stays behind with empty feedback when a later step
//! fails. Each error variant's display text is the status line shown for
//! that failure.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::inference::{InferenceError, InferenceService};
use crate::models::feedback::{FeedbackParseError, FeedbackReport};
use crate::models::submission::{submission_key, SubmissionRecord};
use crate::render::{DocumentRenderer, RenderError};
use crate::storage::files::{DocumentFile, FileStore, StoreError};
use crate::storage::kv::{KvError, KvStore};
use crate::submission::prompts::prepare_instructions;
use crate::submission::status::{emit, PipelineStatus, StatusSender};

/// One submission's input. The resume document is required by construction;
/// a submission without a file never reaches the pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub resume: DocumentFile,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Error: Failed to upload file")]
    ResumeUpload(#[source] StoreError),
    #[error("Error: Failed to convert PDF to image")]
    PreviewRender(#[source] RenderError),
    #[error("Error: Failed to upload image")]
    PreviewUpload(#[source] StoreError),
    #[error("Error: Failed to prepare data")]
    Encode(#[from] serde_json::Error),
    #[error("Error: Failed to save submission")]
    Persist(#[from] KvError),
    #[error("Error: Failed to analyze resume")]
    Inference(#[source] InferenceError),
    #[error("Error: Failed to read feedback")]
    Feedback(#[from] FeedbackParseError),
}

/// Runs the full pipeline for one submission, emitting a status per step and
/// exactly one terminal status at the end.
pub async fn analyze_submission(
    files: &dyn FileStore,
    renderer: &dyn DocumentRenderer,
    kv: &dyn KvStore,
    ai: &dyn InferenceService,
    request: AnalyzeRequest,
    progress: &StatusSender,
) -> Result<SubmissionRecord, PipelineError> {
    let result = run(files, renderer, kv, ai, request, progress).await;
    match &result {
        Ok(record) => emit(progress, PipelineStatus::Complete { id: record.id }),
        Err(error) => emit(progress, PipelineStatus::Failed { message: error.to_string() }),
    }
    result
}

async fn run(
    files: &dyn FileStore,
    renderer: &dyn DocumentRenderer,
    kv: &dyn KvStore,
    ai: &dyn InferenceService,
    request: AnalyzeRequest,
    progress: &StatusSender,
) -> Result<SubmissionRecord, PipelineError> {
    emit(progress, PipelineStatus::UploadingResume);
    let stored_resume = files
        .upload(&request.resume)
        .await
        .map_err(PipelineError::ResumeUpload)?;

    emit(progress, PipelineStatus::RenderingPreview);
    let preview = renderer
        .render_preview(&request.resume)
        .await
        .map_err(PipelineError::PreviewRender)?;

    emit(progress, PipelineStatus::UploadingPreview);
    let stored_preview = files
        .upload(&preview)
        .await
        .map_err(PipelineError::PreviewUpload)?;

    emit(progress, PipelineStatus::SavingSubmission);
    let id = Uuid::new_v4();
    let mut record = SubmissionRecord {
        id,
        resume_path: stored_resume.path,
        image_path: stored_preview.path,
        company_name: request.company_name,
        job_title: request.job_title,
        job_description: request.job_description,
        feedback: None,
    };
    kv.set(&submission_key(id), &record.to_blob()?).await?;
    info!(submission = %id, "record written, starting analysis");

    emit(progress, PipelineStatus::Analyzing);
    let instructions = prepare_instructions(&record.job_title, &record.job_description);
    let response = ai
        .feedback(&record.resume_path, &instructions)
        .await
        .map_err(PipelineError::Inference)?;
    let text = response
        .message
        .content
        .text()
        .ok_or(PipelineError::Inference(InferenceError::EmptyContent))?;
    let feedback = FeedbackReport::from_inference_text(text)?;

    record.feedback = Some(feedback);
    kv.set(&submission_key(id), &record.to_blob()?).await?;
    info!(submission = %id, "analysis complete");

    Ok(record)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
