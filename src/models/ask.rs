use serde::{ Serialize, Deserialize };
use serde_json::Value;

pub const NO_RESPONSE_TEXT: &str = "No response received.";
pub const NETWORK_ERROR_TEXT: &str = "Network error. Please check your connection.";
pub const ERROR_CONFIDENCE: &str = "error";

/// Body of `POST /ask`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_user_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_assistant_answer: Option<String>,
}

impl AskRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            prev_user_query: None,
            prev_assistant_answer: None,
        }
    }

    pub fn with_context(mut self, prev_user_query: &str, prev_assistant_answer: &str) -> Self {
        self.prev_user_query = Some(prev_user_query.to_string());
        self.prev_assistant_answer = Some(prev_assistant_answer.to_string());
        self
    }
}

/// How one `/ask` round trip ended, as far as the widget is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AskOutcome {
    Answer {
        answer: String,
        confidence: Option<String>,
    },
    EndpointError {
        error: String,
        detail: Option<String>,
    },
    NoResponse,
    Unreachable(String),
}

fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

impl AskOutcome {
    /// Classifies a decoded response body. An answer wins over an error when
    /// both are present.
    pub fn from_body(body: &Value) -> Self {
        if let Some(answer) = non_empty_str(body, "answer") {
            return AskOutcome::Answer {
                answer: answer.to_string(),
                confidence: body
                    .get("confidence")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            };
        }
        if let Some(error) = non_empty_str(body, "error") {
            return AskOutcome::EndpointError {
                error: error.to_string(),
                detail: non_empty_str(body, "detail").map(str::to_string),
            };
        }
        AskOutcome::NoResponse
    }

    /// Text that replaces the placeholder entry.
    pub fn reply_text(&self) -> String {
        match self {
            AskOutcome::Answer { answer, .. } => answer.clone(),
            AskOutcome::EndpointError { error, detail } => {
                format!("Error: {}", detail.as_deref().unwrap_or(error))
            }
            AskOutcome::NoResponse => NO_RESPONSE_TEXT.to_string(),
            AskOutcome::Unreachable(_) => NETWORK_ERROR_TEXT.to_string(),
        }
    }

    pub fn confidence(&self) -> Option<&str> {
        match self {
            AskOutcome::Answer { confidence, .. } => confidence.as_deref(),
            _ => Some(ERROR_CONFIDENCE),
        }
    }
}
