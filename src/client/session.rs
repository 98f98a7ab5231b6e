//! Per-connection session state.
//!
//! The session is owned by the client task and changes only through the
//! `mark_*` transitions below, so the link state, nickname and reconnect
//! counter can never be left half-updated.

/// Where the link to the server stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// Transport is up, waiting for the welcome numeric.
    Registering,
    /// The server confirmed our nickname.
    Registered,
}

impl LinkState {
    /// Whether there is a live transport to write to.
    pub fn is_connected(self) -> bool {
        matches!(self, LinkState::Registering | LinkState::Registered)
    }
}

/// Outcome of a lost connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossOutcome {
    /// The link was up (or coming up) and reconnection is enabled.
    Reconnect { attempt: u32 },
    /// Reconnection is disabled; the client should stop.
    Stop,
    /// Already disconnected, nothing to do.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Session {
    nickname: String,
    username: String,
    realname: String,
    state: LinkState,
    reconnect_enabled: bool,
    reconnect_attempt: u32,
}

impl Session {
    pub fn new(
        nickname: impl Into<String>,
        username: impl Into<String>,
        realname: impl Into<String>,
        reconnect_enabled: bool,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            username: username.into(),
            realname: realname.into(),
            state: LinkState::Disconnected,
            reconnect_enabled,
            reconnect_attempt: 1,
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn realname(&self) -> &str {
        &self.realname
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn reconnect_enabled(&self) -> bool {
        self.reconnect_enabled
    }

    pub fn reconnect_attempt(&self) -> u32 {
        self.reconnect_attempt
    }

    /// A connection attempt has been requested.
    pub fn mark_connecting(&mut self) {
        self.state = LinkState::Connecting;
    }

    /// The transport is up; registration begins.
    pub fn mark_established(&mut self) {
        self.state = LinkState::Registering;
    }

    /// The server sent the welcome numeric. An empty nickname keeps the one
    /// we asked for.
    pub fn mark_registered(&mut self, nickname: &str) {
        if !nickname.is_empty() {
            self.nickname = nickname.to_string();
        }
        self.state = LinkState::Registered;
        self.reconnect_attempt = 1;
    }

    /// Our own NICK change was acknowledged by the server.
    pub fn rename(&mut self, nickname: &str) {
        self.nickname = nickname.to_string();
    }

    /// The transport went away, or a connection attempt failed.
    pub fn mark_lost(&mut self) -> LossOutcome {
        if self.state == LinkState::Disconnected {
            return LossOutcome::Ignored;
        }
        self.state = LinkState::Disconnected;
        if self.reconnect_enabled {
            LossOutcome::Reconnect { attempt: self.reconnect_attempt }
        } else {
            LossOutcome::Stop
        }
    }

    /// The user asked to quit: no more reconnects. Idempotent.
    pub fn mark_disconnected_by_user(&mut self) {
        self.reconnect_enabled = false;
    }

    /// A reconnect wait has elapsed. Returns `false` if reconnection was
    /// disabled in the meantime or a connection is already underway.
    pub fn begin_retry(&mut self) -> bool {
        if !self.reconnect_enabled || self.state != LinkState::Disconnected {
            return false;
        }
        self.reconnect_attempt += 1;
        self.state = LinkState::Connecting;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("crab", "crabuser", "Crab Bot", true)
    }

    #[test]
    fn test_lifecycle() {
        let mut s = session();
        assert_eq!(s.state(), LinkState::Disconnected);
        assert!(!s.is_connected());

        s.mark_connecting();
        assert_eq!(s.state(), LinkState::Connecting);
        assert!(!s.is_connected());

        s.mark_established();
        assert_eq!(s.state(), LinkState::Registering);
        assert!(s.is_connected());

        s.mark_registered("crab_");
        assert_eq!(s.state(), LinkState::Registered);
        assert_eq!(s.nickname(), "crab_");
        assert_eq!(s.username(), "crabuser");
        assert_eq!(s.realname(), "Crab Bot");
    }

    #[test]
    fn test_registration_resets_attempts() {
        let mut s = session();
        s.mark_connecting();
        assert_eq!(s.mark_lost(), LossOutcome::Reconnect { attempt: 1 });
        assert!(s.begin_retry());
        assert_eq!(s.mark_lost(), LossOutcome::Reconnect { attempt: 2 });
        assert!(s.begin_retry());
        assert_eq!(s.reconnect_attempt(), 3);

        s.mark_established();
        s.mark_registered("");
        assert_eq!(s.reconnect_attempt(), 1);
        assert_eq!(s.nickname(), "crab");
    }

    #[test]
    fn test_loss_without_reconnect_stops() {
        let mut s = Session::new("crab", "crab", "crab", false);
        s.mark_connecting();
        s.mark_established();
        assert_eq!(s.mark_lost(), LossOutcome::Stop);
        assert_eq!(s.state(), LinkState::Disconnected);
    }

    #[test]
    fn test_second_loss_is_ignored() {
        let mut s = session();
        s.mark_connecting();
        s.mark_established();
        assert_eq!(s.mark_lost(), LossOutcome::Reconnect { attempt: 1 });
        assert_eq!(s.mark_lost(), LossOutcome::Ignored);
    }

    #[test]
    fn test_quit_cancels_pending_retry() {
        let mut s = session();
        s.mark_connecting();
        s.mark_established();
        assert!(matches!(s.mark_lost(), LossOutcome::Reconnect { .. }));

        s.mark_disconnected_by_user();
        s.mark_disconnected_by_user();
        assert!(!s.reconnect_enabled());
        assert!(!s.begin_retry());
        assert_eq!(s.reconnect_attempt(), 1);
    }

    #[test]
    fn test_quit_before_loss_stops() {
        let mut s = session();
        s.mark_connecting();
        s.mark_established();
        s.mark_disconnected_by_user();
        assert_eq!(s.mark_lost(), LossOutcome::Stop);
        assert_eq!(s.mark_lost(), LossOutcome::Ignored);
    }
}
