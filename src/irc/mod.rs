//! IRC protocol layer: line framing, message parsing, prefixes, numerics,
//! CTCP envelopes, outbound framing and command builders.

pub mod buffer;
pub mod commands;
pub mod ctcp;
pub mod frame;
pub mod message;
pub mod numeric;
pub mod prefix;

pub use buffer::LineBuffer;
pub use message::{Message, Tags};
pub use prefix::Prefix;
