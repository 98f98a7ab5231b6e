use crate::client::connection::Connection;
use crate::error::ConnectError;

/// Counter identifying one connection attempt. Events from an older
/// generation are stale and ignored.
pub type Generation = u64;

/// Everything the client task reacts to, in arrival order.
#[derive(Debug)]
pub enum ClientEvent {
    /// A connection attempt succeeded.
    Established { generation: Generation, conn: Connection },

    /// A connection attempt failed before the link came up.
    ConnectFailed { generation: Generation, error: ConnectError },

    /// Bytes read from the socket.
    Data { generation: Generation, bytes: Vec<u8> },

    /// The link went away (EOF, read or write error).
    Lost { generation: Generation, reason: String },

    /// A reconnect wait has elapsed.
    Retry { generation: Generation },

    /// A framed line from a handle or a scheduled send.
    Send { frame: Vec<u8> },

    /// The user asked to disconnect.
    Quit { message: Option<String> },
}
