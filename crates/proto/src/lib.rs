//! Wire contract between the chat client and the assistant service.
//!
//! This crate establishes the request/reply shapes exchanged with the
//! assistant endpoint, and the [`AssistantService`] trait that transports
//! implement, so that the conversation logic never depends on how a turn
//! actually reaches the backend.
//!
//! Replies are decoded at the boundary into [`TurnOutcome`], which means
//! callers never branch on the presence of optional JSON fields.

#![deny(missing_docs)]

mod error;
mod history;
mod reply;
mod request;
mod service;

pub use error::*;
pub use history::*;
pub use reply::*;
pub use request::*;
pub use service::*;
