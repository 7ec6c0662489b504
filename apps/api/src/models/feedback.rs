//! Feedback report schema: the structured shape the inference output must
//! decode into before a submission is considered analyzed.
//!
//! The shape mirrors the instruction prompt: an overall score plus five
//! scored categories, each carrying a list of good/improve tips.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The inference output could not be decoded into a [`FeedbackReport`].
#[derive(Debug, Error)]
#[error("feedback payload is not a valid report: {0}")]
pub struct FeedbackParseError(#[from] serde_json::Error);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipKind {
    Good,
    Improve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
    /// Longer form advice; only some categories ask the model for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFeedback {
    /// 0 to 100.
    pub score: u32,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub overall_score: u32,
    pub ats: CategoryFeedback,
    pub tone_and_style: CategoryFeedback,
    pub content: CategoryFeedback,
    pub structure: CategoryFeedback,
    pub skills: CategoryFeedback,
}

impl FeedbackReport {
    /// Decodes a report from raw inference text. Models occasionally wrap the
    /// JSON in markdown code fences despite being told not to, so those are
    /// stripped first. Any other deviation from the schema is an error.
    pub fn from_inference_text(text: &str) -> Result<Self, FeedbackParseError> {
        Ok(serde_json::from_str(strip_json_fences(text))?)
    }
}

/// Strips a leading ```` ```json ```` / ```` ``` ```` fence pair when present.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let body = body.trim_start();
    match body.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => body.trim_end(),
    }
}
