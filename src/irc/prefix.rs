//! Message prefix resolution.
//!
//! A prefix names the origin of a message: either a server (`irc.example.net`)
//! or a user mask (`nick!user@host`). Resolution is lenient: a prefix that
//! has a `!` but no `@` after it is not a usable mask, so it is kept whole as
//! an opaque server-style name rather than split into partial fields.

use std::fmt;

/// The origin of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// A server name, or any prefix that is not a complete user mask.
    Server(String),
    /// A user mask. All three parts are always present.
    User { nick: String, user: String, host: String },
}

impl Prefix {
    /// Resolve prefix text (without the leading `:`) into its parts.
    ///
    /// A leading `~` (the "no ident" marker) is stripped from both the nick
    /// and the user part.
    pub fn resolve(text: &str) -> Prefix {
        let Some((nick, userhost)) = text.split_once('!') else {
            return Prefix::Server(text.to_string());
        };
        let Some((user, host)) = userhost.split_once('@') else {
            tracing::trace!(prefix = text, "prefix has '!' without '@', keeping it opaque");
            return Prefix::Server(text.to_string());
        };

        Prefix::User {
            nick: nick.trim_start_matches('~').to_string(),
            user: user.trim_start_matches('~').to_string(),
            host: host.to_string(),
        }
    }

    /// Nickname for user prefixes.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::User { nick, .. } => Some(nick),
            Prefix::Server(_) => None,
        }
    }

    /// The name to show as the sender: the nick for users, the server name
    /// otherwise.
    pub fn name(&self) -> &str {
        match self {
            Prefix::User { nick, .. } => nick,
            Prefix::Server(name) => name,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Prefix::Server(_))
    }
}

/// Build `nick!user@host` from its parts.
pub fn compose(nick: &str, user: &str, host: &str) -> String {
    format!("{}!{}@{}", nick, user, host)
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Server(name) => f.write_str(name),
            Prefix::User { nick, user, host } => write!(f, "{}!{}@{}", nick, user, host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(nick: &str, user: &str, host: &str) -> Prefix {
        Prefix::User { nick: nick.into(), user: user.into(), host: host.into() }
    }

    #[test]
    fn test_resolve_user_mask() {
        assert_eq!(Prefix::resolve("nick!~user@host"), user("nick", "user", "host"));
        assert_eq!(
            Prefix::resolve("~nick!user@some.host.example"),
            user("nick", "user", "some.host.example")
        );
    }

    #[test]
    fn test_resolve_server_name() {
        let prefix = Prefix::resolve("irc.example.net");
        assert_eq!(prefix, Prefix::Server("irc.example.net".into()));
        assert!(prefix.is_server());
        assert_eq!(prefix.nick(), None);
        assert_eq!(prefix.name(), "irc.example.net");
    }

    #[test]
    fn test_bang_without_at_is_opaque() {
        assert_eq!(Prefix::resolve("nick!user"), Prefix::Server("nick!user".into()));
        assert_eq!(Prefix::resolve("nick@host!user"), Prefix::Server("nick@host!user".into()));
    }

    #[test]
    fn test_split_on_first_separators() {
        assert_eq!(Prefix::resolve("a!b!c@d@e"), user("a", "b!c", "d@e"));
    }

    #[test]
    fn test_compose_resolve_roundtrip() {
        for p in ["nick!user@host", "Guest42!webchat@gateway/web/irccloud", "a!b@c.d"] {
            let resolved = Prefix::resolve(p);
            let Prefix::User { nick, user, host } = &resolved else {
                panic!("expected user prefix for {}", p);
            };
            assert_eq!(compose(nick, user, host), p);
            assert_eq!(resolved.to_string(), p);
        }
    }
}
