use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolchat_proto::ToolCallRecord;

/// How the scripted service answers one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// A successful reply.
    #[serde(rename = "reply")]
    Reply {
        response: String,
        #[serde(default)]
        tool_calls: Vec<ToolCallRecord>,
        history: Value,
    },
    /// The service handles the request but reports an error.
    #[serde(rename = "service_error")]
    ServiceError(String),
    /// The request never reaches the service.
    #[serde(rename = "unreachable")]
    Unreachable(String),
    /// A raw reply body, decoded the same way a real transport would.
    #[serde(rename = "raw")]
    Raw(Value),
    /// The request task panics with the given message.
    #[serde(rename = "panic")]
    Panic(String),
    /// The service panics before it even returns a future.
    #[serde(rename = "panic_on_send")]
    PanicOnSend(String),
    /// The service never answers.
    #[serde(rename = "pending")]
    Pending,
}

impl PresetReply {
    /// Creates a successful reply without tool calls.
    #[inline]
    pub fn reply(response: impl Into<String>, history: Value) -> Self {
        Self::Reply {
            response: response.into(),
            tool_calls: vec![],
            history,
        }
    }

    /// Creates a successful reply with tool calls.
    #[inline]
    pub fn reply_with_tools(
        response: impl Into<String>,
        tool_calls: impl Into<Vec<ToolCallRecord>>,
        history: Value,
    ) -> Self {
        Self::Reply {
            response: response.into(),
            tool_calls: tool_calls.into(),
            history,
        }
    }
}
