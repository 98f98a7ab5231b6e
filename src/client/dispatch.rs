//! Message dispatch.
//!
//! Every complete line goes through [`Dispatcher::handle_line`]: it is parsed,
//! its command translated to a handler name, and routed to whatever callback
//! was registered under that name. Unknown commands and missing handlers are
//! routine and dropped silently.
//!
//! A few commands are handled here before user code sees them:
//! - `PING` is answered with `PONG` immediately.
//! - `welcome` (001) records the nickname the server assigned us.
//! - `PRIVMSG` / `NOTICE` carrying `\x01` are routed to CTCP handlers.

use std::collections::HashMap;

use chrono::Local;

use crate::client::connection::Transport;
use crate::client::session::Session;
use crate::config::CtcpConfig;
use crate::error::SendError;
use crate::irc::ctcp::Ctcp;
use crate::irc::{commands, frame, numeric, Message, Prefix, Tags};

/// A message as handed to handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Handler name: the translated command (`privmsg`, `welcome`, ...) or,
    /// for CTCP, the sub-command as sent (`ACTION`, `VERSION`).
    pub command: String,
    pub tags: Tags,
    pub prefix: Option<Prefix>,
    /// Arguments. For CTCP the second one holds the payload.
    pub args: Vec<String>,
}

impl Event {
    fn lifecycle(name: &str) -> Self {
        Self {
            command: name.to_string(),
            ..Self::default()
        }
    }

    /// Sender nick, or server name, or empty.
    pub fn source(&self) -> &str {
        self.prefix.as_ref().map(Prefix::name).unwrap_or("")
    }

    /// First argument: usually the channel or nick a message was sent to.
    pub fn target(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }

    /// Second argument: message text, or the CTCP payload.
    pub fn message(&self) -> &str {
        self.args.get(1).map(String::as_str).unwrap_or("")
    }
}

/// A registered callback. Returning `Some(line)` sends that line right away.
pub type Handler = Box<dyn FnMut(&Event) -> Option<String> + Send>;

/// What happened to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty command; nothing to route.
    Dropped,
    /// A PING, answered internally.
    Ponged,
    /// The welcome numeric: the session is now registered.
    Registered,
    /// A handler was invoked.
    Handled,
    /// No handler is registered for this command.
    Unhandled,
}

/// Command name → handler tables.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<String, Handler>,
    ctcp_handlers: HashMap<String, Handler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher preloaded with the standard CTCP replies enabled in
    /// `config`.
    pub fn with_ctcp_defaults(config: &CtcpConfig) -> Self {
        let mut dispatcher = Self::new();

        if config.reply_version {
            let version = config.version_string.clone();
            dispatcher.on_ctcp("version", move |ev| reply(ev, "VERSION", &version));
        }
        if config.reply_ping {
            dispatcher.on_ctcp("ping", |ev| reply(ev, "PING", ev.message()));
        }
        if config.reply_time {
            dispatcher.on_ctcp("time", |ev| {
                let now = Local::now().format("%a %b %d %H:%M:%S %Y").to_string();
                reply(ev, "TIME", &now)
            });
        }
        if config.reply_finger {
            let finger = config.finger_string.clone();
            dispatcher.on_ctcp("finger", move |ev| reply(ev, "FINGER", &finger));
        }

        dispatcher
    }

    /// Register a handler for a command name (case-insensitive). Replaces any
    /// previous handler for that name.
    pub fn on<F>(&mut self, command: &str, handler: F)
    where
        F: FnMut(&Event) -> Option<String> + Send + 'static,
    {
        self.handlers.insert(command.to_ascii_lowercase(), Box::new(handler));
    }

    /// Register a handler for a CTCP sub-command (case-insensitive).
    pub fn on_ctcp<F>(&mut self, command: &str, handler: F)
    where
        F: FnMut(&Event) -> Option<String> + Send + 'static,
    {
        self.ctcp_handlers.insert(command.to_ascii_lowercase(), Box::new(handler));
    }

    pub fn has_handler(&self, command: &str) -> bool {
        self.handlers.contains_key(&command.to_ascii_lowercase())
    }

    /// Parse and route one line.
    ///
    /// Errors come only from sending a reply (a PONG or a handler's return
    /// value); the line itself has been fully processed either way.
    pub fn handle_line(
        &mut self,
        session: &mut Session,
        line: &str,
        transport: &mut dyn Transport,
    ) -> Result<Dispatch, SendError> {
        let msg = Message::parse(line);
        let command = numeric::translate(&msg.command);
        if command.is_empty() {
            return Ok(Dispatch::Dropped);
        }

        tracing::debug!(prefix = msg.source(), %command, args = ?msg.args, "<-");

        let mut event = Event {
            command,
            tags: msg.tags,
            prefix: msg.prefix,
            args: msg.args,
        };

        match event.command.as_str() {
            "welcome" => {
                session.mark_registered(event.target());
                tracing::info!(nickname = session.nickname(), "registered");
                // Registration stands even if the handler's reply cannot be sent.
                if let Err(e) = self.invoke(&event, transport) {
                    tracing::warn!(error = %e, "welcome handler reply failed");
                }
                Ok(Dispatch::Registered)
            }
            "ping" => {
                match event.args.first() {
                    Some(token) => send(transport, &commands::pong(token))?,
                    None => tracing::debug!("PING without a token, not answering"),
                }
                Ok(Dispatch::Ponged)
            }
            "privmsg" | "notice" => {
                if let Some(ctcp) = event.args.get(1).and_then(|text| Ctcp::parse(text)) {
                    let command = ctcp.command.to_string();
                    let payload = ctcp.payload.to_string();
                    event.command = command;
                    event.args[1] = payload;
                    self.invoke_ctcp(&event, transport)
                } else {
                    self.invoke(&event, transport)
                }
            }
            "nick" => {
                let own = event
                    .prefix
                    .as_ref()
                    .and_then(Prefix::nick)
                    .is_some_and(|nick| nick.eq_ignore_ascii_case(session.nickname()));
                if own && !event.target().is_empty() {
                    session.rename(event.target());
                }
                self.invoke(&event, transport)
            }
            _ => self.invoke(&event, transport),
        }
    }

    /// Fire a lifecycle handler (`connect`, `disconnect`) that does not come
    /// from the wire.
    pub fn notify(&mut self, name: &str, transport: &mut dyn Transport) -> Result<Dispatch, SendError> {
        self.invoke(&Event::lifecycle(name), transport)
    }

    fn invoke(&mut self, event: &Event, transport: &mut dyn Transport) -> Result<Dispatch, SendError> {
        let Some(handler) = self.handlers.get_mut(&event.command) else {
            return Ok(Dispatch::Unhandled);
        };
        respond(handler(event), transport)
    }

    fn invoke_ctcp(&mut self, event: &Event, transport: &mut dyn Transport) -> Result<Dispatch, SendError> {
        let key = event.command.to_ascii_lowercase();
        let Some(handler) = self.ctcp_handlers.get_mut(&key) else {
            tracing::debug!(ctcp = %event.command, from = event.source(), "no CTCP handler");
            return Ok(Dispatch::Unhandled);
        };
        respond(handler(event), transport)
    }
}

fn respond(reply: Option<String>, transport: &mut dyn Transport) -> Result<Dispatch, SendError> {
    match reply {
        Some(line) if !line.is_empty() => send(transport, &line)?,
        _ => {}
    }
    Ok(Dispatch::Handled)
}

/// Frame and write one line.
pub(crate) fn send(transport: &mut dyn Transport, line: &str) -> Result<(), SendError> {
    let bytes = frame::frame(line)?;
    tracing::debug!("-> {}", line);
    transport.write(&bytes)
}

fn reply(event: &Event, command: &str, payload: &str) -> Option<String> {
    match event.prefix.as_ref().and_then(Prefix::nick) {
        Some(nick) => Some(commands::ctcp_reply(nick, command, payload)),
        None => None,
    }
}
