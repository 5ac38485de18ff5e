//! An in-process assistant service for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;
use toolchat_proto::{
    AssistantService, AssistantServiceError, ConversationHistory, ErrorKind,
    TurnOutcome, TurnReply, TurnRequest,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl AssistantServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    requests: Vec<TurnRequest>,
}

/// A scripted assistant service for testing purpose.
///
/// Before sending requests, queue up the replies the service should give.
/// Each request consumes the next queued reply, and an error is returned
/// when the script runs out. Every request is recorded, so tests can check
/// what the caller actually sent.
///
/// Clones share the same script.
#[derive(Clone, Default)]
pub struct TestAssistantService {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestAssistantService {
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.lock().replies.push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<TurnRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned lock only means a test already panicked.
        self.script.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Debug for TestAssistantService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestAssistantService")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl AssistantService for TestAssistantService {
    type Error = crate::Error;

    fn send_turn(
        &self,
        req: &TurnRequest,
    ) -> impl Future<Output = Result<TurnOutcome, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut script = self.lock();
            script.requests.push(req.clone());
            script.replies.pop_front()
        };
        if let Some(PresetReply::PanicOnSend(message)) = &preset {
            panic!("{message}");
        }
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            let Some(preset) = preset else {
                return Err(Error {
                    message: "no more scripted replies".to_owned(),
                    kind: ErrorKind::Other,
                });
            };
            match preset {
                PresetReply::Reply {
                    response,
                    tool_calls,
                    history,
                } => Ok(TurnOutcome::Completed(TurnReply {
                    response,
                    tool_calls,
                    history: ConversationHistory::from_value(history),
                })),
                PresetReply::ServiceError(message) => {
                    Ok(TurnOutcome::ServiceFailed(message))
                }
                PresetReply::Unreachable(message) => Err(Error {
                    message,
                    kind: ErrorKind::Connect,
                }),
                PresetReply::Raw(body) => {
                    TurnOutcome::from_value(body).map_err(|err| Error {
                        message: err.message().to_owned(),
                        kind: ErrorKind::Decode,
                    })
                }
                PresetReply::Panic(message)
                | PresetReply::PanicOnSend(message) => panic!("{message}"),
                PresetReply::Pending => pending().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use toolchat_proto::ToolCallRecord;

    use super::*;

    fn request(message: &str) -> TurnRequest {
        TurnRequest {
            message: message.to_owned(),
            history: ConversationHistory::default(),
        }
    }

    #[tokio::test]
    async fn test_send_turn() {
        let mut service = TestAssistantService::default();
        service.add_reply(PresetReply::reply(
            "Hello, world!",
            json!([{ "role": "assistant", "content": "Hello, world!" }]),
        ));
        service.add_reply(PresetReply::reply_with_tools(
            "Rolled a 4.",
            [ToolCallRecord {
                tool_name: "roll_dice".to_owned(),
                input: "6".to_owned(),
                output: "4".to_owned(),
                succeeded: true,
            }],
            json!([]),
        ));

        let outcome = service.send_turn(&request("Hi")).await.unwrap();
        let TurnOutcome::Completed(reply) = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert_eq!(reply.response, "Hello, world!");

        let outcome = service.send_turn(&request("Roll")).await.unwrap();
        let TurnOutcome::Completed(reply) = outcome else {
            panic!("unexpected outcome: {outcome:?}");
        };
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].tool_name, "roll_dice");

        let messages: Vec<_> =
            service.requests().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, ["Hi", "Roll"]);
    }

    #[tokio::test]
    async fn test_failures() {
        let mut service = TestAssistantService::default();
        service.add_reply(PresetReply::Unreachable("refused".to_owned()));
        service.add_reply(PresetReply::Raw(json!({ "response": "no log" })));

        let err = service.send_turn(&request("a")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connect);
        let err = service.send_turn(&request("b")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        let err = service.send_turn(&request("c")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
