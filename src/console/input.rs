//! User slash-command parser.
//!
//! Parses `/command arg1 arg2 ...` input lines into typed [`ParsedCommand`]
//! values that the console can act on.

/// A parsed user command. Each variant corresponds to a `/command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Join { channel: String, key: Option<String> },
    Part { channel: Option<String>, reason: Option<String> },
    Query { target: String },
    Nick { nick: String },
    Msg { target: String, text: String },
    Me { text: String },
    Notice { target: String, text: String },
    Quit { message: Option<String> },
    Help,
    Kick { channel: Option<String>, user: String, reason: Option<String> },
    Mode { target: String, modes: String },
    Topic { text: Option<String> },
    Whois { nick: String },
    Who { target: Option<String> },
    Raw { command: String },
    Ctcp { target: String, command: String, payload: String },
    Later { secs: u64, text: String },
}

/// Parse a slash-command string into a [`ParsedCommand`].
///
/// Returns `None` if the input does not start with `/` or is not a recognized
/// command. Commands are case-insensitive.
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let body = input.strip_prefix('/')?;

    let parts: Vec<&str> = body.splitn(3, ' ').collect();
    let cmd = parts.first()?.to_lowercase();
    // Everything after the command word, untouched.
    let rest = body.split_once(' ').map(|(_, r)| r.trim()).filter(|r| !r.is_empty());

    match cmd.as_str() {
        "join" | "j" => {
            let channel = parts.get(1)?.to_string();
            let channel = if is_channel(&channel) { channel } else { format!("#{}", channel) };
            let key = parts.get(2).map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
            Some(ParsedCommand::Join { channel, key })
        }
        "part" | "leave" => {
            let (channel, reason) = match rest {
                Some(r) => match r.split_once(' ') {
                    Some((first, tail)) if is_channel(first) => (Some(first.to_string()), Some(tail.to_string())),
                    None if is_channel(r) => (Some(r.to_string()), None),
                    _ => (None, Some(r.to_string())),
                },
                None => (None, None),
            };
            Some(ParsedCommand::Part { channel, reason })
        }
        "query" | "q" => {
            let target = parts.get(1)?.to_string();
            Some(ParsedCommand::Query { target })
        }
        "nick" => {
            let nick = parts.get(1)?.to_string();
            Some(ParsedCommand::Nick { nick })
        }
        "msg" => {
            let target = parts.get(1)?.to_string();
            let text = parts.get(2).unwrap_or(&"").to_string();
            Some(ParsedCommand::Msg { target, text })
        }
        "me" => Some(ParsedCommand::Me { text: rest.unwrap_or("").to_string() }),
        "notice" => {
            let target = parts.get(1)?.to_string();
            let text = parts.get(2).unwrap_or(&"").to_string();
            Some(ParsedCommand::Notice { target, text })
        }
        "quit" | "exit" => Some(ParsedCommand::Quit { message: rest.map(str::to_string) }),
        "help" | "h" => Some(ParsedCommand::Help),
        "kick" => {
            let arg1 = parts.get(1)?.to_string();
            let tail = parts.get(2).map(|s| s.to_string());
            if is_channel(&arg1) {
                // /kick #channel user [reason]
                let tail = tail?;
                let mut sp = tail.splitn(2, ' ');
                let user = sp.next().unwrap_or("").to_string();
                let reason = sp.next().map(|s| s.to_string());
                Some(ParsedCommand::Kick { channel: Some(arg1), user, reason })
            } else {
                // /kick user [reason]
                Some(ParsedCommand::Kick { channel: None, user: arg1, reason: tail })
            }
        }
        "mode" => {
            let target = parts.get(1)?.to_string();
            let modes = parts.get(2).map(|s| s.to_string()).unwrap_or_default();
            Some(ParsedCommand::Mode { target, modes })
        }
        "topic" | "t" => Some(ParsedCommand::Topic { text: rest.map(str::to_string) }),
        "whois" | "wi" => {
            let nick = parts.get(1)?.to_string();
            Some(ParsedCommand::Whois { nick })
        }
        "who" => Some(ParsedCommand::Who { target: parts.get(1).map(|s| s.to_string()) }),
        "raw" | "quote" => Some(ParsedCommand::Raw { command: rest?.to_string() }),
        "ctcp" => {
            let target = parts.get(1)?.to_string();
            let (command, payload) = match parts.get(2) {
                Some(tail) => match tail.split_once(' ') {
                    Some((c, p)) => (c.to_string(), p.to_string()),
                    None => (tail.to_string(), String::new()),
                },
                None => ("VERSION".to_string(), String::new()),
            };
            Some(ParsedCommand::Ctcp { target, command, payload })
        }
        "later" => {
            let secs = parts.get(1)?.parse().ok()?;
            let text = parts.get(2)?.to_string();
            Some(ParsedCommand::Later { secs, text })
        }
        _ => None,
    }
}

pub fn is_channel(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}

pub const HELP: &[&str] = &[
    "/join <#channel> [key]     join a channel and make it current",
    "/part [#channel] [reason]  leave a channel",
    "/query <nick|#channel>     switch the current target",
    "/msg <target> <text>       send a message",
    "/me <text>                 action in the current target",
    "/notice <target> <text>    send a notice",
    "/nick <nick>               change nickname",
    "/topic [text]              show or set the current channel's topic",
    "/kick [#channel] <nick> [reason]",
    "/mode <target> [modes]",
    "/whois <nick>   /who [target]",
    "/ctcp <target> [command] [payload]",
    "/later <secs> <text>       send to the current target after a delay",
    "/raw <line>                send a raw protocol line",
    "/quit [message]",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/unknown thing"), None);
        assert_eq!(parse_command("/join"), None);
    }

    #[test]
    fn test_join_adds_hash() {
        assert_eq!(
            parse_command("/join rust"),
            Some(ParsedCommand::Join { channel: "#rust".into(), key: None })
        );
        assert_eq!(
            parse_command("/J &local secret"),
            Some(ParsedCommand::Join { channel: "&local".into(), key: Some("secret".into()) })
        );
    }

    #[test]
    fn test_part_variants() {
        assert_eq!(parse_command("/part"), Some(ParsedCommand::Part { channel: None, reason: None }));
        assert_eq!(
            parse_command("/part #rust"),
            Some(ParsedCommand::Part { channel: Some("#rust".into()), reason: None })
        );
        assert_eq!(
            parse_command("/part #rust see you"),
            Some(ParsedCommand::Part { channel: Some("#rust".into()), reason: Some("see you".into()) })
        );
        assert_eq!(
            parse_command("/leave off to bed"),
            Some(ParsedCommand::Part { channel: None, reason: Some("off to bed".into()) })
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            parse_command("/msg bob hi there"),
            Some(ParsedCommand::Msg { target: "bob".into(), text: "hi there".into() })
        );
        assert_eq!(parse_command("/me waves  twice"), Some(ParsedCommand::Me { text: "waves  twice".into() }));
        assert_eq!(
            parse_command("/notice bob psst"),
            Some(ParsedCommand::Notice { target: "bob".into(), text: "psst".into() })
        );
    }

    #[test]
    fn test_quit_and_topic() {
        assert_eq!(parse_command("/quit"), Some(ParsedCommand::Quit { message: None }));
        assert_eq!(
            parse_command("/exit gone fishing"),
            Some(ParsedCommand::Quit { message: Some("gone fishing".into()) })
        );
        assert_eq!(parse_command("/topic"), Some(ParsedCommand::Topic { text: None }));
        assert_eq!(
            parse_command("/t new topic here"),
            Some(ParsedCommand::Topic { text: Some("new topic here".into()) })
        );
    }

    #[test]
    fn test_kick() {
        assert_eq!(
            parse_command("/kick #rust troll go away"),
            Some(ParsedCommand::Kick {
                channel: Some("#rust".into()),
                user: "troll".into(),
                reason: Some("go away".into()),
            })
        );
        assert_eq!(
            parse_command("/kick troll"),
            Some(ParsedCommand::Kick { channel: None, user: "troll".into(), reason: None })
        );
        assert_eq!(parse_command("/kick #rust"), None);
    }

    #[test]
    fn test_ctcp_defaults_to_version() {
        assert_eq!(
            parse_command("/ctcp bob"),
            Some(ParsedCommand::Ctcp { target: "bob".into(), command: "VERSION".into(), payload: String::new() })
        );
        assert_eq!(
            parse_command("/ctcp bob ping 12345"),
            Some(ParsedCommand::Ctcp { target: "bob".into(), command: "ping".into(), payload: "12345".into() })
        );
    }

    #[test]
    fn test_raw_and_later() {
        assert_eq!(
            parse_command("/raw PRIVMSG #a :x"),
            Some(ParsedCommand::Raw { command: "PRIVMSG #a :x".into() })
        );
        assert_eq!(parse_command("/raw"), None);
        assert_eq!(
            parse_command("/later 30 time's up"),
            Some(ParsedCommand::Later { secs: 30, text: "time's up".into() })
        );
        assert_eq!(parse_command("/later soon hi"), None);
    }
}
