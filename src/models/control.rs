use serde_json::Value;
use std::fmt;

pub const CLOSE_PAYLOAD: &str = "superion:close";
pub const OPEN_PAYLOAD: &str = "superion:open";

/// Control signals exchanged between the conversation frame and the host page.
///
/// The wire form is a bare string. Anything else travelling over the same
/// channel is unrelated traffic and maps to `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlSignal {
    Open,
    Close,
}

impl ControlSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlSignal::Open => OPEN_PAYLOAD,
            ControlSignal::Close => CLOSE_PAYLOAD,
        }
    }

    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            OPEN_PAYLOAD => Some(ControlSignal::Open),
            CLOSE_PAYLOAD => Some(ControlSignal::Close),
            _ => None,
        }
    }

    pub fn from_payload(payload: &Value) -> Option<Self> {
        payload.as_str().and_then(Self::parse)
    }

    pub fn to_payload(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
