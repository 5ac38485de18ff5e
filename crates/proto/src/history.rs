use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The backend's record of prior turns.
///
/// The client treats this as an opaque token: it is sent verbatim with every
/// request and replaced wholesale by whatever the service returns. Nothing
/// on the client side should look into it, which is why the inner value is
/// only reachable by consuming the history.
///
/// Comparing two histories compares the underlying JSON structurally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory(Value);

impl ConversationHistory {
    /// Wraps a JSON value returned by the service.
    #[inline]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Unwraps the raw JSON value.
    #[inline]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for ConversationHistory {
    /// An empty log, which is what the service expects on the first turn.
    #[inline]
    fn default() -> Self {
        Self(Value::Array(vec![]))
    }
}
