//! AI inference client, the single entry point for feedback calls.
//!
//! The hosted inference endpoint reads the uploaded resume straight from the
//! file store, so requests carry only the stored path plus the instruction
//! text. Responses wrap an assistant message whose content arrives either as
//! a plain string or as a sequence of text blocks; both shapes decode into
//! [`MessageContent`] and are flattened by [`MessageContent::text`].
//!
//! Failures are terminal for the calling pipeline: no retries happen here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Generous transport timeout; vision-model analysis of a full resume page
/// routinely takes tens of seconds.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("inference returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    path: &'a str,
    instructions: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: MessageContent,
}

/// The two content shapes the endpoint may answer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    pub text: String,
}

impl MessageContent {
    /// Extracts the textual payload: the string itself, or the first block's
    /// text. `None` when a block list is empty.
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(blocks) => blocks.first().map(|b| b.text.as_str()),
        }
    }
}

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Asks the platform to analyze the stored document under `document_path`
    /// following `instructions`.
    async fn feedback(
        &self,
        document_path: &str,
        instructions: &str,
    ) -> Result<FeedbackResponse, InferenceError>;
}

/// HTTP client for the platform's hosted feedback endpoint.
pub struct FeedbackClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl FeedbackClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client, endpoint, api_key }
    }
}

#[async_trait]
impl InferenceService for FeedbackClient {
    async fn feedback(
        &self,
        document_path: &str,
        instructions: &str,
    ) -> Result<FeedbackResponse, InferenceError> {
        let body = FeedbackRequest { path: document_path, instructions };

        let response = self
            .client
            .post(format!("{}/ai/feedback", self.endpoint.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(InferenceError::Api { status: status.as_u16(), message });
        }

        let feedback: FeedbackResponse = response.json().await?;
        debug!("inference call succeeded for '{document_path}'");
        Ok(feedback)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
