//! Axum handlers for the submission routes.
//!
//! `POST /api/v1/submissions` accepts the upload form (three text fields plus
//! the resume file), runs the analysis pipeline to completion, and answers
//! with the finished record plus a `Location` pointing at its detail route.
//! Pipeline statuses are drained into the log while the analysis runs.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::SessionContext;
use crate::errors::AppError;
use crate::models::submission::SubmissionRecord;
use crate::state::AppState;
use crate::storage::files::DocumentFile;
use crate::submission::listing::{load_listing, load_submission, ListingView};
use crate::submission::pipeline::{analyze_submission, AnalyzeRequest};

/// File extensions accepted for resume uploads.
const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// POST /api/v1/submissions
pub async fn handle_analyze(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request = parse_submission_form(multipart).await?;
    info!(
        user = %session.username,
        company = %request.company_name,
        job_title = %request.job_title,
        "starting resume analysis"
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            info!(status = %status, "analysis progress");
        }
    });

    let result = analyze_submission(
        state.files.as_ref(),
        state.renderer.as_ref(),
        state.kv.as_ref(),
        state.ai.as_ref(),
        request,
        &tx,
    )
    .await;

    // Close the channel so the progress task drains and exits.
    drop(tx);
    let _ = progress.await;

    let record = result?;
    let location = format!("/api/v1/submissions/{}", record.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)).into_response())
}

/// GET /api/v1/submissions
pub async fn handle_list_submissions(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ListingView>, AppError> {
    let view = load_listing(state.kv.as_ref()).await?;
    debug!(user = %session.username, count = view.submissions.len(), "listing loaded");
    Ok(Json(view))
}

/// GET /api/v1/submissions/:id
pub async fn handle_get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionRecord>, AppError> {
    let record = load_submission(state.kv.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))?;
    Ok(Json(record))
}

// ────────────────────────────────────────────────────────────────────────────
// Form parsing
// ────────────────────────────────────────────────────────────────────────────

/// Pulls the three text fields and the resume file out of the multipart form.
/// A submission without a file is rejected here, before any collaborator is
/// touched.
async fn parse_submission_form(mut multipart: Multipart) -> Result<AnalyzeRequest, AppError> {
    let mut company_name = None;
    let mut job_title = None;
    let mut job_description = None;
    let mut resume: Option<DocumentFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "company-name" => company_name = Some(read_text_field(field, &name).await?),
            "job-title" => job_title = Some(read_text_field(field, &name).await?),
            "job-description" => job_description = Some(read_text_field(field, &name).await?),
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                check_extension(&file_name)?;
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes: Bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read resume upload: {e}"))
                })?;
                if bytes.is_empty() {
                    return Err(AppError::Validation("resume file is empty".to_string()));
                }
                resume = Some(DocumentFile { file_name, content_type, bytes });
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    let resume = resume
        .ok_or_else(|| AppError::Validation("no resume file selected".to_string()))?;

    Ok(AnalyzeRequest {
        company_name: required_field(company_name, "company-name")?,
        job_title: required_field(job_title, "job-title")?,
        job_description: required_field(job_description, "job-description")?,
        resume,
    })
}

async fn read_text_field(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))
}

fn required_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Validation(format!("missing required field '{name}'"))),
    }
}

fn check_extension(file_name: &str) -> Result<(), AppError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "only PDF, DOC and DOCX files are accepted".to_string(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
