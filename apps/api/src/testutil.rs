//! Shared test doubles for the collaborator seams, plus fixture builders.
//!
//! Every stub records its calls into a [`CallLog`] shared across the rig, so
//! tests can assert both call counts and relative ordering (e.g. the record
//! write happening before the inference call).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{AuthError, Authenticator, SessionContext};
use crate::config::Config;
use crate::inference::{
    AssistantMessage, ContentBlock, FeedbackResponse, InferenceError, InferenceService,
    MessageContent,
};
use crate::models::submission::SubmissionRecord;
use crate::render::{DocumentRenderer, RenderError};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::files::{DocumentFile, FileStore, StoreError, StoredFile};
use crate::storage::kv::{KvError, KvItem, KvStore};
use crate::submission::pipeline::AnalyzeRequest;

// ────────────────────────────────────────────────────────────────────────────
// Call log
// ────────────────────────────────────────────────────────────────────────────

/// Append-only event log shared by all stubs in a test rig.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| e.as_str() == entry).count()
    }

    /// Index of the first occurrence of `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stub collaborators
// ────────────────────────────────────────────────────────────────────────────

pub struct StubFileStore {
    log: CallLog,
    calls: AtomicUsize,
    /// 1-based call number that fails; `None` never fails.
    fail_on_call: Option<usize>,
}

impl StubFileStore {
    pub fn new(log: CallLog) -> Self {
        Self { log, calls: AtomicUsize::new(0), fail_on_call: None }
    }

    pub fn failing_on(log: CallLog, call: usize) -> Self {
        Self { log, calls: AtomicUsize::new(0), fail_on_call: Some(call) }
    }
}

#[async_trait]
impl FileStore for StubFileStore {
    async fn upload(&self, file: &DocumentFile) -> Result<StoredFile, StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.push(format!("upload:{}", file.file_name));
        if self.fail_on_call == Some(call) {
            return Err(StoreError::Upload("stubbed upload failure".to_string()));
        }
        Ok(StoredFile { path: format!("stored/{}", file.file_name) })
    }
}

pub struct StubRenderer {
    log: CallLog,
    fail: bool,
}

impl StubRenderer {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: CallLog) -> Self {
        Self { log, fail: true }
    }
}

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn render_preview(&self, file: &DocumentFile) -> Result<DocumentFile, RenderError> {
        self.log.push("render");
        if self.fail {
            return Err(RenderError::MissingOutput);
        }
        let stem = file.file_name.strip_suffix(".pdf").unwrap_or(&file.file_name);
        Ok(DocumentFile {
            file_name: format!("{stem}.png"),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"fake png bytes"),
        })
    }
}

/// In-memory key-value store recording every write in order.
pub struct MemoryKv {
    log: CallLog,
    entries: Mutex<BTreeMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_sets: bool,
}

impl MemoryKv {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            entries: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(Vec::new()),
            fail_sets: false,
        }
    }

    pub fn failing_sets(log: CallLog) -> Self {
        Self { fail_sets: true, ..Self::new(log) }
    }

    /// Inserts a fixture entry without touching the log or write history.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    /// Every `set` call as `(key, value)`, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.log.push("kv.set");
        if self.fail_sets {
            return Err(KvError::Backend(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "stubbed kv failure",
            ))));
        }
        self.writes.lock().unwrap().push((key.to_string(), value.to_string()));
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.log.push("kv.get");
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn list(&self, prefix: &str, include_values: bool) -> Result<Vec<KvItem>, KvError> {
        self.log.push("kv.list");
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvItem {
                key: key.clone(),
                value: include_values.then(|| value.clone()),
            })
            .collect())
    }
}

pub struct StubInference {
    log: CallLog,
    /// `None` makes every call fail with an API error.
    response: Option<FeedbackResponse>,
}

impl StubInference {
    pub fn new(log: CallLog, response: Option<FeedbackResponse>) -> Self {
        Self { log, response }
    }
}

#[async_trait]
impl InferenceService for StubInference {
    async fn feedback(
        &self,
        _document_path: &str,
        _instructions: &str,
    ) -> Result<FeedbackResponse, InferenceError> {
        self.log.push("ai.feedback");
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(InferenceError::Api { status: 500, message: "stubbed failure".to_string() }),
        }
    }
}

pub struct StubAuth {
    pub session: Option<SessionContext>,
}

#[async_trait]
impl Authenticator for StubAuth {
    async fn authenticate(&self, _token: &str) -> Result<Option<SessionContext>, AuthError> {
        Ok(self.session.clone())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

/// A feedback payload matching the report schema, overall score 72.
pub fn report_json() -> String {
    serde_json::json!({
        "overall_score": 72,
        "ats": {"score": 80, "tips": [{"type": "good", "tip": "Standard headings"}]},
        "tone_and_style": {"score": 65, "tips": []},
        "content": {"score": 70, "tips": []},
        "structure": {"score": 75, "tips": []},
        "skills": {"score": 68, "tips": []}
    })
    .to_string()
}

pub fn text_response(text: &str) -> FeedbackResponse {
    FeedbackResponse {
        message: AssistantMessage { content: MessageContent::Text(text.to_string()) },
    }
}

pub fn blocks_response(text: &str) -> FeedbackResponse {
    FeedbackResponse {
        message: AssistantMessage {
            content: MessageContent::Blocks(vec![ContentBlock { text: text.to_string() }]),
        },
    }
}

pub fn sample_request() -> AnalyzeRequest {
    AnalyzeRequest {
        company_name: "Acme".to_string(),
        job_title: "Platform Engineer".to_string(),
        job_description: "Build and run the platform.".to_string(),
        resume: DocumentFile {
            file_name: "resume.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4 fake"),
        },
    }
}

pub fn sample_record() -> SubmissionRecord {
    SubmissionRecord {
        id: Uuid::new_v4(),
        resume_path: "resumes/a/resume.pdf".to_string(),
        image_path: "resumes/b/resume.png".to_string(),
        company_name: "Acme".to_string(),
        job_title: "Platform Engineer".to_string(),
        job_description: "Build and run the platform.".to_string(),
        feedback: None,
    }
}

pub fn test_session() -> SessionContext {
    SessionContext {
        username: "test-user".to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

pub fn expired_session() -> SessionContext {
    SessionContext {
        username: "test-user".to_string(),
        expires_at: Utc::now() - chrono::Duration::hours(1),
    }
}

pub fn test_config() -> Config {
    Config {
        redis_url: "redis://localhost:6379".to_string(),
        s3_bucket: "test-bucket".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        ai_endpoint: "http://localhost:9990".to_string(),
        ai_api_key: "test-key".to_string(),
        auth_endpoint: "http://localhost:9991".to_string(),
        auth_login_url: "/auth".to_string(),
        renderer_bin: "pdftoppm".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Router-level rig
// ────────────────────────────────────────────────────────────────────────────

/// Full application wired to stubs, for request-level tests.
pub struct TestApp {
    pub log: CallLog,
    pub kv: Arc<MemoryKv>,
    pub state: AppState,
}

impl TestApp {
    fn new(session: Option<SessionContext>) -> Self {
        let log = CallLog::default();
        let kv = Arc::new(MemoryKv::new(log.clone()));
        let state = AppState {
            files: Arc::new(StubFileStore::new(log.clone())),
            kv: kv.clone(),
            ai: Arc::new(StubInference::new(log.clone(), Some(text_response(&report_json())))),
            renderer: Arc::new(StubRenderer::new(log.clone())),
            auth: Arc::new(StubAuth { session }),
            config: test_config(),
        };
        TestApp { log, kv, state }
    }

    pub fn authenticated() -> Self {
        Self::new(Some(test_session()))
    }

    pub fn unauthenticated() -> Self {
        Self::new(None)
    }

    pub fn with_expired_session() -> Self {
        Self::new(Some(expired_session()))
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "test-boundary-7f4a";

/// Builds an upload form body with the three text fields and, optionally, a
/// resume file part.
pub fn multipart_body(file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("company-name", "Acme"),
        ("job-title", "Platform Engineer"),
        ("job-description", "Build and run the platform."),
    ] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
