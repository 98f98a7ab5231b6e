//! The client task.
//!
//! [`Client`] owns the session, the dispatcher and the live connection, and
//! processes one event at a time from a single channel: socket data, losses,
//! retry timers, and sends or quits coming from [`ClientHandle`]s. Nothing
//! else touches the session, so no locking is needed.

pub mod connection;
pub mod dispatch;
pub mod event;
pub mod reconnect;
pub mod schedule;
pub mod session;

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::config::{AppConfig, ServerConfig};
use crate::error::SendError;
use crate::irc::{commands, frame, LineBuffer};
use crate::logging::{Direction, Transcript};
use connection::Connection;
use dispatch::Dispatch;
use event::{ClientEvent, Generation};
use reconnect::{ReconnectPolicy, Recovery};
use session::Session;

pub use connection::Transport;
pub use dispatch::{Dispatcher, Event, Handler};
pub use schedule::ScheduledSend;
pub use session::LinkState;

/// How long to wait for the server to close the link after `QUIT`.
const QUIT_GRACE: Duration = Duration::from_secs(10);

pub struct Client {
    server: ServerConfig,
    policy: ReconnectPolicy,
    session: Session,
    dispatcher: Dispatcher,
    transcript: Option<Transcript>,
    buffer: LineBuffer,
    conn: Option<Connection>,
    generation: Generation,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    state_tx: watch::Sender<LinkState>,
}

impl Client {
    pub fn new(config: &AppConfig) -> Self {
        let server = config.server.clone();
        let session = Session::new(
            server.nickname.clone(),
            server.username(),
            server.realname(),
            config.reconnect.enabled,
        );
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(LinkState::Disconnected);

        Self {
            transcript: Transcript::from_config(&config.logging, &server.host),
            policy: config.reconnect.policy(),
            dispatcher: Dispatcher::with_ctcp_defaults(&config.ctcp),
            session,
            server,
            buffer: LineBuffer::new(),
            conn: None,
            generation: 0,
            event_tx,
            event_rx,
            state_tx,
        }
    }

    /// Register a handler for a command, a numeric name (`welcome`,
    /// `nicknameinuse`, ...) or a lifecycle event (`connect`, `disconnect`).
    pub fn on<F>(&mut self, command: &str, handler: F)
    where
        F: FnMut(&Event) -> Option<String> + Send + 'static,
    {
        self.dispatcher.on(command, handler);
    }

    /// Register a handler for a CTCP sub-command such as `ACTION` or
    /// `VERSION`. Replaces the built-in reply for that sub-command.
    pub fn on_ctcp<F>(&mut self, command: &str, handler: F)
    where
        F: FnMut(&Event) -> Option<String> + Send + 'static,
    {
        self.dispatcher.on_ctcp(command, handler);
    }

    pub fn set_reconnect_policy(&mut self, policy: ReconnectPolicy) {
        self.policy = policy;
    }

    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            events: self.event_tx.clone(),
            state: self.state_tx.subscribe(),
        }
    }

    /// Connect and process events until the client quits, or the link is
    /// lost with reconnection disabled.
    pub async fn run(mut self) {
        self.session.mark_connecting();
        self.start_connect();

        while let Some(event) = self.event_rx.recv().await {
            if self.process(event).is_break() {
                break;
            }
        }

        self.conn = None;
        self.publish();
        tracing::info!("client stopped");
    }

    fn process(&mut self, event: ClientEvent) -> ControlFlow<()> {
        match event {
            ClientEvent::Established { generation, conn } => {
                if generation != self.generation || self.session.state() != LinkState::Connecting {
                    tracing::debug!(generation, "dropping stale connection");
                    return ControlFlow::Continue(());
                }
                self.established(conn);
                ControlFlow::Continue(())
            }
            ClientEvent::ConnectFailed { generation, error } => {
                if generation != self.generation {
                    return ControlFlow::Continue(());
                }
                tracing::warn!(error = %error, "connection failed");
                self.lost()
            }
            ClientEvent::Data { generation, bytes } => {
                if generation == self.generation && self.conn.is_some() {
                    self.buffer.push(&bytes);
                    self.drain_lines();
                }
                ControlFlow::Continue(())
            }
            ClientEvent::Lost { generation, reason } => {
                if generation != self.generation || self.conn.is_none() {
                    return ControlFlow::Continue(());
                }
                tracing::warn!(%reason, "connection lost");
                self.conn = None;
                self.lost()
            }
            ClientEvent::Retry { generation } => {
                if generation == self.generation && self.session.begin_retry() {
                    self.publish();
                    self.start_connect();
                }
                ControlFlow::Continue(())
            }
            ClientEvent::Send { frame } => {
                let result = self.outbound().write(&frame);
                if let Err(e) = result {
                    tracing::warn!(error = %e, "send failed");
                }
                ControlFlow::Continue(())
            }
            ClientEvent::Quit { message } => self.quit(message.as_deref()),
        }
    }

    fn start_connect(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let tx = self.event_tx.clone();
        let server = self.server.clone();

        tokio::spawn(async move {
            let event = match Connection::open(
                &server.host,
                server.port,
                server.tls,
                server.accept_invalid_certs,
                generation,
                tx.clone(),
            )
            .await
            {
                Ok(conn) => ClientEvent::Established { generation, conn },
                Err(error) => ClientEvent::ConnectFailed { generation, error },
            };
            let _ = tx.send(event);
        });
    }

    fn established(&mut self, conn: Connection) {
        tracing::info!(host = %self.server.host, port = self.server.port, "connected");
        self.conn = Some(conn);
        self.buffer.clear();
        self.session.mark_established();
        self.publish();

        let mut out = self.outbound_parts();
        if let Err(e) = out.1.notify("connect", &mut out.0) {
            tracing::warn!(error = %e, "connect handler reply failed");
        }

        if let Some(password) = self.server.password.clone() {
            self.send_line(&commands::pass(&password));
        }
        let nick = commands::nick(self.session.nickname());
        let user = commands::user(self.session.username(), self.session.realname());
        self.send_line(&nick);
        self.send_line(&user);
    }

    fn drain_lines(&mut self) {
        let lines: Vec<String> = self.buffer.lines().collect();
        for line in lines {
            if let Some(transcript) = self.transcript.as_mut() {
                transcript.record(Direction::Inbound, &line);
            }

            let mut out = Outbound {
                conn: self.conn.as_mut(),
                transcript: self.transcript.as_mut(),
            };
            match self.dispatcher.handle_line(&mut self.session, &line, &mut out) {
                Ok(Dispatch::Registered) => self.registered(),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "reply failed"),
            }
        }
    }

    fn registered(&mut self) {
        self.publish();
        for channel in self.server.channels.clone() {
            self.send_line(&commands::join(&channel, None));
        }
    }

    fn lost(&mut self) -> ControlFlow<()> {
        let recovery = reconnect::on_lost(&mut self.session, &self.policy);
        if recovery == Recovery::Nothing {
            return ControlFlow::Continue(());
        }

        self.publish();
        let mut out = self.outbound_parts();
        if let Err(e) = out.1.notify("disconnect", &mut out.0) {
            tracing::debug!(error = %e, "disconnect handler reply dropped");
        }

        match recovery {
            Recovery::RetryAfter(delay) => {
                let generation = self.generation;
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ClientEvent::Retry { generation });
                });
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Break(()),
        }
    }

    fn quit(&mut self, message: Option<&str>) -> ControlFlow<()> {
        self.session.mark_disconnected_by_user();
        if self.conn.is_none() {
            return ControlFlow::Break(());
        }

        tracing::info!("quitting");
        self.send_line(&commands::quit(message));

        let generation = self.generation;
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(QUIT_GRACE).await;
            let _ = tx.send(ClientEvent::Lost {
                generation,
                reason: "server did not close the link after QUIT".to_string(),
            });
        });
        ControlFlow::Continue(())
    }

    fn send_line(&mut self, line: &str) {
        if let Err(e) = dispatch::send(&mut self.outbound(), line) {
            tracing::warn!(error = %e, line, "send failed");
        }
    }

    fn outbound(&mut self) -> Outbound<'_> {
        Outbound {
            conn: self.conn.as_mut(),
            transcript: self.transcript.as_mut(),
        }
    }

    fn outbound_parts(&mut self) -> (Outbound<'_>, &mut Dispatcher) {
        (
            Outbound {
                conn: self.conn.as_mut(),
                transcript: self.transcript.as_mut(),
            },
            &mut self.dispatcher,
        )
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.session.state());
    }
}

/// The live connection seen through the transcript.
struct Outbound<'a> {
    conn: Option<&'a mut Connection>,
    transcript: Option<&'a mut Transcript>,
}

impl Transport for Outbound<'_> {
    fn write(&mut self, frame: &[u8]) -> Result<(), SendError> {
        let conn = self.conn.as_deref_mut().ok_or(SendError::NotConnected)?;
        conn.write(frame)?;
        if let Some(transcript) = self.transcript.as_deref_mut() {
            let text = String::from_utf8_lossy(frame);
            transcript.record(Direction::Outbound, text.trim_end_matches("\r\n"));
        }
        Ok(())
    }
}

/// Cloneable, thread-safe way to talk to a running [`Client`].
///
/// Every send is framed first, so an invalid line is reported even while
/// disconnected. A valid line fails with `NotConnected` when there is no
/// link to the server.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    events: mpsc::UnboundedSender<ClientEvent>,
    state: watch::Receiver<LinkState>,
}

impl ClientHandle {
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Wait until the link reaches `wanted`. Fails if the client stops first.
    pub async fn wait_for(&self, wanted: LinkState) -> Result<(), SendError> {
        let mut state = self.state.clone();
        state
            .wait_for(|s| *s == wanted)
            .await
            .map(|_| ())
            .map_err(|_| SendError::NotConnected)
    }

    /// Frame `line` and queue it for the client task. `Ok` means the line
    /// was queued; delivery is best-effort after that, and a write that
    /// races a lost link is only logged.
    pub fn send_raw(&self, line: &str) -> Result<(), SendError> {
        let frame = frame::frame(line)?;
        if !self.is_connected() {
            return Err(SendError::NotConnected);
        }
        self.events
            .send(ClientEvent::Send { frame })
            .map_err(|_| SendError::NotConnected)
    }

    pub fn privmsg(&self, target: &str, text: &str) -> Result<(), SendError> {
        self.send_raw(&commands::privmsg(target, text))
    }

    pub fn notice(&self, target: &str, text: &str) -> Result<(), SendError> {
        self.send_raw(&commands::notice(target, text))
    }

    pub fn action(&self, target: &str, text: &str) -> Result<(), SendError> {
        self.send_raw(&commands::action(target, text))
    }

    pub fn ctcp(&self, target: &str, command: &str, payload: &str) -> Result<(), SendError> {
        self.send_raw(&commands::ctcp(target, command, payload))
    }

    pub fn ctcp_reply(&self, target: &str, command: &str, payload: &str) -> Result<(), SendError> {
        self.send_raw(&commands::ctcp_reply(target, command, payload))
    }

    pub fn join(&self, channel: &str, key: Option<&str>) -> Result<(), SendError> {
        self.send_raw(&commands::join(channel, key))
    }

    pub fn part(&self, channel: &str, message: Option<&str>) -> Result<(), SendError> {
        self.send_raw(&commands::part(&[channel], message))
    }

    pub fn nick(&self, nickname: &str) -> Result<(), SendError> {
        self.send_raw(&commands::nick(nickname))
    }

    pub fn mode(&self, target: &str, modes: &str) -> Result<(), SendError> {
        self.send_raw(&commands::mode(target, modes))
    }

    pub fn topic(&self, channel: &str, topic: Option<&str>) -> Result<(), SendError> {
        self.send_raw(&commands::topic(channel, topic))
    }

    pub fn kick(&self, channel: &str, nick: &str, comment: Option<&str>) -> Result<(), SendError> {
        self.send_raw(&commands::kick(channel, nick, comment))
    }

    pub fn invite(&self, nick: &str, channel: &str) -> Result<(), SendError> {
        self.send_raw(&commands::invite(nick, channel))
    }

    pub fn names(&self, channels: &[&str]) -> Result<(), SendError> {
        self.send_raw(&commands::names(channels))
    }

    pub fn whois(&self, nick: &str) -> Result<(), SendError> {
        self.send_raw(&commands::whois(&[nick]))
    }

    pub fn who(&self, target: Option<&str>, operators_only: bool) -> Result<(), SendError> {
        self.send_raw(&commands::who(target, operators_only))
    }

    /// Disable reconnection and leave. The client stops once the server
    /// closes the link, or right away if there is no link.
    pub fn quit(&self, message: Option<&str>) -> Result<(), SendError> {
        frame::frame(&commands::quit(message))?;
        self.events
            .send(ClientEvent::Quit {
                message: message.map(str::to_string),
            })
            .map_err(|_| SendError::NotConnected)
    }
}
