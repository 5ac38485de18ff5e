use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConversationHistory;

/// Describes one tool invocation that the backend executed while producing
/// a reply.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Display name of the tool.
    #[serde(rename = "tool", default, deserialize_with = "text_or_json")]
    pub tool_name: String,
    /// The input the tool was called with.
    #[serde(default, deserialize_with = "text_or_json")]
    pub input: String,
    /// What the tool produced.
    #[serde(default, deserialize_with = "text_or_json")]
    pub output: String,
    /// Whether the tool reported success.
    #[serde(rename = "success", default)]
    pub succeeded: bool,
}

/// A successful reply for one turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReply {
    /// The assistant's textual reply.
    pub response: String,
    /// Tool calls made during this turn, in execution order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// The history to send with the next request.
    pub history: ConversationHistory,
}

/// How the assistant service concluded a turn.
///
/// Transport failures are not represented here, they are reported through
/// the service's error type instead.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    /// The service produced a reply.
    Completed(TurnReply),
    /// The service handled the request but reported a failure.
    ServiceFailed(String),
}

impl TurnOutcome {
    /// Decodes a reply body.
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| DecodeError::new(format!("{err}")))?;
        Self::from_value(value)
    }

    /// Decodes an already parsed reply body.
    ///
    /// A truthy `error` field wins over everything else in the body, so the
    /// remaining fields are only validated when it is absent.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut fields) = value else {
            return Err(DecodeError::new("reply is not a JSON object"));
        };

        if let Some(message) = fields.remove("error").and_then(error_message)
        {
            return Ok(TurnOutcome::ServiceFailed(message));
        }

        let response: String = required_field(&mut fields, "response")?;
        let history: ConversationHistory =
            required_field(&mut fields, "history")?;
        let tool_calls = match fields.remove("tool_calls") {
            None | Some(Value::Null) => vec![],
            Some(value) => decode_field("tool_calls", value)?,
        };

        Ok(TurnOutcome::Completed(TurnReply {
            response,
            tool_calls,
            history,
        }))
    }
}

/// The reply body could not be understood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for DecodeError {}

fn required_field<T: DeserializeOwned>(
    fields: &mut serde_json::Map<String, Value>,
    name: &str,
) -> Result<T, DecodeError> {
    match fields.remove(name) {
        None | Some(Value::Null) => {
            Err(DecodeError::new(format!("missing field `{name}`")))
        }
        Some(value) => decode_field(name, value),
    }
}

fn decode_field<T: DeserializeOwned>(
    name: &str,
    value: Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value)
        .map_err(|err| DecodeError::new(format!("invalid `{name}`: {err}")))
}

/// Follows the service's convention that an empty or false-y `error` means
/// there was no error at all.
fn error_message(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn text_or_json<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
