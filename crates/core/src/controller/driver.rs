use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use toolchat_proto::{TurnOutcome, TurnRequest};
use tracing::Instrument;

use super::{Controller, ControllerBuilder};
use crate::conversation::{Conversation, Snapshot};
use crate::service_client::ServiceClient;

#[derive(Debug)]
pub enum Command {
    Submit(String),
    SubmitInput,
    UpdateInput(String),
    TurnFinished(Result<TurnOutcome, String>),
}

struct ControllerState {
    conversation: Conversation,
    service_client: ServiceClient,
    snapshot_tx: watch::Sender<Snapshot>,
    // Weak, so that an in-flight request doesn't keep the session alive.
    cmd_tx: mpsc::WeakUnboundedSender<Command>,
    running_task: Option<JoinHandle<()>>,
    on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Controller {
    pub(super) fn spawn_from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            service_client,
            on_idle,
        } = builder;

        let conversation = Conversation::new();
        let (snapshot_tx, snapshot_rx) =
            watch::channel(conversation.snapshot());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let state = ControllerState {
            conversation,
            service_client,
            snapshot_tx,
            cmd_tx: cmd_tx.downgrade(),
            running_task: None,
            on_idle,
        };
        tokio::spawn(
            run_controller(state, cmd_rx).instrument(trace_span!("controller")),
        );

        Self {
            cmd_tx,
            snapshot_rx,
        }
    }
}

async fn run_controller(
    mut state: ControllerState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");
        state.handle(cmd);
    }
    if let Some(task) = state.running_task.take() {
        debug!("abandoning the in-flight request");
        task.abort();
    }
    debug!("will terminate");
}

impl ControllerState {
    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(text) => {
                let req = self.conversation.submit(text);
                self.start_turn(req);
            }
            Command::SubmitInput => {
                let req = self.conversation.submit_input();
                self.start_turn(req);
            }
            Command::UpdateInput(text) => {
                self.conversation.update_input_buffer(text);
                self.publish();
            }
            Command::TurnFinished(result) => self.finish_turn(result),
        }
    }

    fn start_turn(&mut self, req: Option<TurnRequest>) {
        let Some(req) = req else {
            // Rejected, nothing has changed.
            return;
        };
        self.publish();

        let service_client = self.service_client.clone();
        let cmd_tx = self.cmd_tx.clone();
        let task = tokio::spawn(
            async move {
                let result = service_client.send_turn(req).await;
                if let Some(cmd_tx) = cmd_tx.upgrade() {
                    cmd_tx.send(Command::TurnFinished(result)).ok();
                }
            }
            .instrument(trace_span!("turn")),
        );
        self.running_task = Some(task);
    }

    fn finish_turn(&mut self, result: Result<TurnOutcome, String>) {
        self.running_task = None;
        if !self.conversation.finish_turn(result) {
            return;
        }

        // The whole turn becomes visible in one snapshot.
        self.publish();

        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    #[inline]
    fn publish(&self) {
        self.snapshot_tx.send_replace(self.conversation.snapshot());
    }
}
