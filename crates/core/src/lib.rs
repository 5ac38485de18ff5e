//! Core logic of the chat client: the conversation state machine and the
//! controller that drives it against an assistant service.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod controller;
pub mod conversation;
mod service_client;

pub use controller::{Controller, ControllerBuilder};
pub use conversation::{Conversation, Message, RequestState, Snapshot};
