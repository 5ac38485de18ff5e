mod builder;
mod driver;
#[cfg(test)]
mod tests;

use tokio::sync::{mpsc, watch};

use crate::conversation::Snapshot;
pub use builder::ControllerBuilder;
use driver::Command;

/// A handle to a running chat session, which owns a [`Conversation`]
/// and relays each accepted turn to the assistant service.
///
/// All mutations go through a single task, so they are applied in the
/// order they were issued. Calls return immediately; the effects become
/// visible through [`Controller::snapshot`] and [`Controller::subscribe`].
///
/// Only one turn can be in flight. Submissions made while awaiting a
/// response are dropped, not queued.
///
/// The session stops once every clone of the handle has been dropped.
/// A request still in flight at that point is abandoned.
///
/// [`Conversation`]: crate::conversation::Conversation
#[derive(Clone)]
pub struct Controller {
    cmd_tx: mpsc::UnboundedSender<Command>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl Controller {
    /// Submits `text` as the next user turn.
    #[inline]
    pub fn submit<S: Into<String>>(&self, text: S) {
        self.send(Command::Submit(text.into()));
    }

    /// Submits the current input buffer as the next user turn.
    #[inline]
    pub fn submit_input(&self) {
        self.send(Command::SubmitInput);
    }

    /// Replaces the input buffer.
    #[inline]
    pub fn update_input_buffer<S: Into<String>>(&self, text: S) {
        self.send(Command::UpdateInput(text.into()));
    }

    /// Returns the latest published snapshot.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Returns a receiver that is notified whenever the snapshot changes.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    fn send(&self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("controller task has stopped, command dropped");
        }
    }
}
