use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SPURIOUS_FIELD: &str = "spuriousComment";

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Up,
    Down,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Up => "up",
            Rating::Down => "down",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rating::Up => "👍",
            Rating::Down => "👎",
        }
    }
}

/// Body posted by the docs page feedback widget.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub path: String,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub code_language: String,
    #[serde(default)]
    pub spurious_comment: bool,
}

impl FeedbackRequest {
    /// Empty comments count as no comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|comment| !comment.is_empty())
    }
}

/// Honeypot check on the raw payload, before any other field is required.
/// Any truthy `spuriousComment` counts.
pub fn is_spurious(payload: &Value) -> bool {
    match payload.get(SPURIOUS_FIELD) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct FeedbackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
