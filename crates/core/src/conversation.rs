//! Conversation-related types.
//!
//! [`Conversation`] is the synchronous state machine behind a chat window:
//! it decides whether a submission is accepted, what gets appended to the
//! transcript, and when the history is advanced. It performs no I/O by
//! itself; [`Controller`](crate::Controller) drives it against a service.

use std::fmt::Display;

use toolchat_proto::{
    ConversationHistory, ToolCallRecord, TurnOutcome, TurnRequest,
};

/// An entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Message {
    /// Text the user submitted.
    User {
        /// The submitted text, as typed.
        text: String,
    },
    /// The assistant's reply.
    Assistant {
        /// The reply text.
        text: String,
    },
    /// Tools the backend ran before replying, in execution order.
    ToolCalls {
        /// The reported calls.
        calls: Vec<ToolCallRecord>,
    },
    /// A failed turn, already formatted for display.
    Error {
        /// The error text.
        text: String,
    },
}

/// Whether a turn is currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestState {
    /// New submissions are accepted.
    #[default]
    Idle,
    /// A request has been sent and its reply has not been applied yet.
    AwaitingResponse,
}

/// An immutable view of a conversation, for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// The transcript, oldest first.
    pub transcript: Vec<Message>,
    /// The current input buffer.
    pub input: String,
    /// The current request state.
    pub state: RequestState,
}

impl Snapshot {
    /// Returns `true` if a turn is in flight.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.state == RequestState::AwaitingResponse
    }

    /// Returns `true` if submitting the current input would be accepted.
    #[inline]
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.input.trim().is_empty()
    }
}

/// The state of one chat session.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    transcript: Vec<Message>,
    input: String,
    state: RequestState,
    history: ConversationHistory,
}

impl Conversation {
    /// Creates an empty conversation in the idle state.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript, oldest first.
    #[inline]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Returns the current input buffer.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the current request state.
    #[inline]
    pub fn request_state(&self) -> RequestState {
        self.state
    }

    /// Returns the history that will be sent with the next request.
    #[inline]
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Replaces the input buffer.
    #[inline]
    pub fn update_input_buffer<S: Into<String>>(&mut self, text: S) {
        self.input = text.into();
    }

    /// Starts a turn with `text`.
    ///
    /// Returns the request to send, or `None` if the submission was
    /// rejected: `text` is blank, or another turn is still in flight. A
    /// rejected submission leaves the conversation untouched.
    pub fn submit<S: Into<String>>(&mut self, text: S) -> Option<TurnRequest> {
        let text = text.into();
        if text.trim().is_empty() {
            trace!("ignored a blank submission");
            return None;
        }
        if self.state != RequestState::Idle {
            debug!("ignored a submission while awaiting a response");
            return None;
        }

        self.transcript.push(Message::User { text: text.clone() });
        self.input.clear();
        self.state = RequestState::AwaitingResponse;

        Some(TurnRequest {
            message: text,
            history: self.history.clone(),
        })
    }

    /// Starts a turn with the current input buffer.
    #[inline]
    pub fn submit_input(&mut self) -> Option<TurnRequest> {
        let text = self.input.clone();
        self.submit(text)
    }

    /// Applies the result of the in-flight turn.
    ///
    /// `Err` carries a description of a transport failure. Whatever the
    /// result, the conversation is idle afterwards.
    ///
    /// Returns `false` if no turn was in flight, in which case the result
    /// is discarded.
    pub fn finish_turn<E: Display>(
        &mut self,
        result: Result<TurnOutcome, E>,
    ) -> bool {
        if self.state != RequestState::AwaitingResponse {
            warn!("got a turn result with no turn in flight, discard it");
            return false;
        }

        match result {
            Ok(TurnOutcome::Completed(reply)) => {
                if !reply.tool_calls.is_empty() {
                    self.transcript.push(Message::ToolCalls {
                        calls: reply.tool_calls,
                    });
                }
                self.transcript.push(Message::Assistant {
                    text: reply.response,
                });
                self.history = reply.history;
            }
            Ok(TurnOutcome::ServiceFailed(message)) => {
                self.transcript.push(Message::Error {
                    text: format!("Error: {message}"),
                });
            }
            Err(err) => {
                self.transcript.push(Message::Error {
                    text: format!("Network error: {err}"),
                });
            }
        }
        self.state = RequestState::Idle;
        true
    }

    /// Takes an immutable snapshot for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transcript: self.transcript.clone(),
            input: self.input.clone(),
            state: self.state,
        }
    }
}
