use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use toolchat_proto::ToolCallRecord;
use toolchat_test_service::{PresetReply, TestAssistantService};

use crate::conversation::{Message, RequestState, Snapshot};
use crate::{Controller, ControllerBuilder};

/// Waits until the controller has settled with `len` transcript entries.
async fn settled(controller: &Controller, len: usize) -> Snapshot {
    let mut rx = controller.subscribe();
    let snapshot = timeout(
        Duration::from_millis(500),
        rx.wait_for(|s| {
            s.state == RequestState::Idle && s.transcript.len() == len
        }),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();
    snapshot
}

fn calculator_call() -> ToolCallRecord {
    ToolCallRecord {
        tool_name: "calculator".to_owned(),
        input: "25*4".to_owned(),
        output: "100".to_owned(),
        succeeded: true,
    }
}

#[tokio::test]
async fn test_plain_reply() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::reply(
        "It is 3 PM",
        json!([{ "role": "assistant", "content": "It is 3 PM" }]),
    ));

    let (idle_tx, mut idle_rx) = watch::channel::<bool>(false);
    let controller = ControllerBuilder::with_service(service)
        .on_idle(move || {
            idle_tx.send(true).unwrap();
        })
        .build();
    controller.submit("What's the time?");

    timeout(Duration::from_millis(500), idle_rx.wait_for(|v| *v))
        .await
        .unwrap()
        .unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.transcript,
        [
            Message::User {
                text: "What's the time?".to_owned()
            },
            Message::Assistant {
                text: "It is 3 PM".to_owned()
            },
        ]
    );
    assert_eq!(snapshot.state, RequestState::Idle);
}

#[tokio::test]
async fn test_tool_calls_then_reply() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::reply_with_tools(
        "100",
        [calculator_call()],
        json!([]),
    ));

    let controller = ControllerBuilder::with_service(service).build();
    controller.submit("Calculate 25*4");

    let snapshot = settled(&controller, 3).await;
    assert_eq!(
        snapshot.transcript[1..],
        [
            Message::ToolCalls {
                calls: vec![calculator_call()]
            },
            Message::Assistant {
                text: "100".to_owned()
            },
        ]
    );
}

#[tokio::test]
async fn test_history_round_trip() {
    let mut service = TestAssistantService::default();
    let first_history = json!([
        { "role": "user", "content": "Hi" },
        { "role": "assistant", "content": "Hello" },
    ]);
    service.add_reply(PresetReply::reply("Hello", first_history.clone()));
    service.add_reply(PresetReply::ServiceError("upstream timeout".to_owned()));
    service.add_reply(PresetReply::Unreachable("refused".to_owned()));
    service.add_reply(PresetReply::reply("Again", json!([])));

    let controller = ControllerBuilder::with_service(service.clone()).build();
    for (i, text) in ["Hi", "Weather in Chennai", "hello", "retry"]
        .into_iter()
        .enumerate()
    {
        controller.submit(text);
        settled(&controller, (i + 1) * 2).await;
    }

    let histories: Vec<_> = service
        .requests()
        .into_iter()
        .map(|r| r.history.into_value())
        .collect();
    // Failed turns never advance the history.
    assert_eq!(
        histories,
        [
            json!([]),
            first_history.clone(),
            first_history.clone(),
            first_history,
        ]
    );

    let transcript = controller.snapshot().transcript;
    assert_eq!(
        transcript[3],
        Message::Error {
            text: "Error: upstream timeout".to_owned()
        }
    );
    assert_eq!(
        transcript[5],
        Message::Error {
            text: "Network error: refused".to_owned()
        }
    );
}

#[tokio::test]
async fn test_blank_submission_sends_nothing() {
    let service = TestAssistantService::default();
    let controller = ControllerBuilder::with_service(service.clone()).build();
    controller.submit("");
    controller.submit("   ");
    controller.update_input_buffer("typed");

    let mut rx = controller.subscribe();
    timeout(Duration::from_millis(500), rx.wait_for(|s| s.input == "typed"))
        .await
        .unwrap()
        .unwrap();

    let snapshot = controller.snapshot();
    assert!(snapshot.transcript.is_empty());
    assert_eq!(snapshot.state, RequestState::Idle);
    assert!(service.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_awaiting_is_dropped() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::Pending);

    let controller = ControllerBuilder::with_service(service.clone()).build();
    controller.submit("first");
    controller.submit("second");
    controller.update_input_buffer("draft");

    let mut rx = controller.subscribe();
    rx.wait_for(|s| s.input == "draft").await.unwrap();
    sleep(Duration::from_secs(60)).await;

    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.transcript,
        [Message::User {
            text: "first".to_owned()
        }]
    );
    assert_eq!(snapshot.state, RequestState::AwaitingResponse);
    assert!(!snapshot.can_submit());
    assert_eq!(service.requests().len(), 1);
}

#[tokio::test]
async fn test_submit_input_buffer() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::reply("Heads", json!([])));

    let controller = ControllerBuilder::with_service(service.clone()).build();
    controller.update_input_buffer("flip a coin");
    controller.submit_input();

    let snapshot = settled(&controller, 2).await;
    assert_eq!(snapshot.input, "");
    assert_eq!(service.requests()[0].message, "flip a coin");
}

#[tokio::test]
async fn test_panicking_service_resets_state() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::Panic("bad reply".to_owned()));
    service.add_reply(PresetReply::reply("recovered", json!([])));

    let controller = ControllerBuilder::with_service(service).build();
    controller.submit("hello");
    let snapshot = settled(&controller, 2).await;
    assert_eq!(
        snapshot.transcript[1],
        Message::Error {
            text: "Network error: bad reply".to_owned()
        }
    );

    controller.submit("hello again");
    let snapshot = settled(&controller, 4).await;
    assert_eq!(
        snapshot.transcript[3],
        Message::Assistant {
            text: "recovered".to_owned()
        }
    );
}

#[tokio::test]
async fn test_malformed_reply_is_a_network_error() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::Raw(json!({ "history": [] })));

    let controller = ControllerBuilder::with_service(service).build();
    controller.submit("hello");
    let snapshot = settled(&controller, 2).await;
    assert_eq!(
        snapshot.transcript[1],
        Message::Error {
            text: "Network error: missing field `response`".to_owned()
        }
    );
}

#[tokio::test]
async fn test_service_panicking_before_its_future_resets_state() {
    let mut service = TestAssistantService::default();
    service.add_reply(PresetReply::PanicOnSend("bad request".to_owned()));
    service.add_reply(PresetReply::reply("recovered", json!([])));

    let controller = ControllerBuilder::with_service(service).build();
    controller.submit("hello");
    let snapshot = settled(&controller, 2).await;
    assert_eq!(
        snapshot.transcript[1],
        Message::Error {
            text: "Network error: bad request".to_owned()
        }
    );

    controller.submit("hello again");
    let snapshot = settled(&controller, 4).await;
    assert_eq!(
        snapshot.transcript[3],
        Message::Assistant {
            text: "recovered".to_owned()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_loading_until_slow_reply_arrives() {
    let mut service = TestAssistantService::default();
    service.set_delay(Duration::from_secs(30));
    service.add_reply(PresetReply::reply("Tails", json!([])));

    let controller = ControllerBuilder::with_service(service).build();
    controller.submit("flip a coin");

    let mut rx = controller.subscribe();
    rx.wait_for(|s| s.is_loading()).await.unwrap();
    sleep(Duration::from_secs(10)).await;
    assert!(controller.snapshot().is_loading());

    sleep(Duration::from_secs(30)).await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, RequestState::Idle);
    assert_eq!(
        snapshot.transcript[1],
        Message::Assistant {
            text: "Tails".to_owned()
        }
    );
}
