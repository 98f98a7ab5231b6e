//! One-line IRC command builders.
//!
//! Each function formats a verb and its arguments into wire text. Nothing is
//! validated here: the result goes through [`crate::irc::frame`] before it is
//! written, which rejects embedded newlines and overlong lines.

use crate::irc::ctcp;

pub fn admin(server: Option<&str>) -> String {
    with_optional("ADMIN", server)
}

pub fn info(server: Option<&str>) -> String {
    with_optional("INFO", server)
}

pub fn invite(nick: &str, channel: &str) -> String {
    format!("INVITE {} {}", nick, channel)
}

pub fn join(channel: &str, key: Option<&str>) -> String {
    match key {
        Some(key) if !key.is_empty() => format!("JOIN {} {}", channel, key),
        _ => format!("JOIN {}", channel),
    }
}

pub fn kick(channel: &str, nick: &str, comment: Option<&str>) -> String {
    match comment {
        Some(comment) if !comment.is_empty() => format!("KICK {} {} :{}", channel, nick, comment),
        _ => format!("KICK {} {}", channel, nick),
    }
}

pub fn mode(target: &str, modes: &str) -> String {
    if modes.is_empty() {
        format!("MODE {}", target)
    } else {
        format!("MODE {} {}", target, modes)
    }
}

pub fn names(channels: &[&str]) -> String {
    if channels.is_empty() {
        "NAMES".to_string()
    } else {
        format!("NAMES {}", channels.join(","))
    }
}

pub fn nick(nickname: &str) -> String {
    format!("NICK {}", nickname)
}

pub fn notice(target: &str, text: &str) -> String {
    format!("NOTICE {} :{}", target, text)
}

pub fn oper(name: &str, password: &str) -> String {
    format!("OPER {} {}", name, password)
}

pub fn part(channels: &[&str], message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => {
            format!("PART {} :{}", channels.join(","), message)
        }
        _ => format!("PART {}", channels.join(",")),
    }
}

pub fn pass(password: &str) -> String {
    format!("PASS {}", password)
}

pub fn ping(target: &str) -> String {
    format!("PING {}", trailing_if_needed(target))
}

/// Reply to a server PING, echoing its token.
pub fn pong(token: &str) -> String {
    format!("PONG {}", trailing_if_needed(token))
}

pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {} :{}", target, text)
}

pub fn quit(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("QUIT :{}", message),
        _ => "QUIT".to_string(),
    }
}

pub fn time(server: Option<&str>) -> String {
    with_optional("TIME", server)
}

/// Query the topic when `topic` is `None`, set it otherwise.
pub fn topic(channel: &str, topic: Option<&str>) -> String {
    match topic {
        Some(topic) => format!("TOPIC {} :{}", channel, topic),
        None => format!("TOPIC {}", channel),
    }
}

/// Registration line: `USER <username> 0 * :<realname>`.
pub fn user(username: &str, realname: &str) -> String {
    format!("USER {} 0 * :{}", username, realname)
}

pub fn userhost(nicks: &[&str]) -> String {
    format!("USERHOST {}", nicks.join(" "))
}

pub fn version(server: Option<&str>) -> String {
    with_optional("VERSION", server)
}

/// `WHO [target] [o]`.
pub fn who(target: Option<&str>, operators_only: bool) -> String {
    let mut line = with_optional("WHO", target);
    if operators_only {
        line.push_str(" o");
    }
    line
}

pub fn whois(targets: &[&str]) -> String {
    format!("WHOIS {}", targets.join(","))
}

/// CTCP request, sent as PRIVMSG.
pub fn ctcp(target: &str, command: &str, payload: &str) -> String {
    privmsg(target, &ctcp::wrap(command, payload))
}

/// CTCP reply, sent as NOTICE.
pub fn ctcp_reply(target: &str, command: &str, payload: &str) -> String {
    notice(target, &ctcp::wrap(command, payload))
}

/// `/me` style action.
pub fn action(target: &str, text: &str) -> String {
    ctcp(target, "ACTION", text)
}

fn with_optional(verb: &str, arg: Option<&str>) -> String {
    match arg {
        Some(arg) if !arg.is_empty() => format!("{} {}", verb, arg),
        _ => verb.to_string(),
    }
}

fn trailing_if_needed(arg: &str) -> String {
    if arg.is_empty() || arg.contains(' ') || arg.starts_with(':') {
        format!(":{}", arg)
    } else {
        arg.to_string()
    }
}
