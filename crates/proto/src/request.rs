use serde::Serialize;

use crate::ConversationHistory;

/// A single user turn to be sent to the assistant service.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnRequest {
    /// The text the user typed.
    pub message: String,
    /// The history returned by the previous successful turn.
    pub history: ConversationHistory,
}
