//! An async IRC client engine.
//!
//! The [`irc`] module holds the protocol pieces: line buffering, message
//! parsing, prefixes, numeric names, CTCP and outbound framing. The
//! [`client`] module runs a connection on top of them, dispatching each
//! message to registered handlers and reconnecting when the link drops.

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod irc;
pub mod logging;

pub use client::{Client, ClientHandle, Event, LinkState};
pub use error::{ConnectError, FrameError, SendError};
