//! A terminal chat client for an assistant that runs tools on its backend.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to embed the chat session in your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod config;
pub mod render;
mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`toolchat_core`] crate.
pub mod core {
    pub use toolchat_core::*;
}
