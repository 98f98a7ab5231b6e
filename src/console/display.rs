//! Printable text for incoming events.

use chrono::Local;

use crate::client::Event;

/// Handler names the console prints.
pub const WATCHED: &[&str] = &[
    "privmsg", "notice", "join", "part", "quit", "nick", "kick", "topic", "mode", "error", "welcome",
    "yourhost", "created", "motd", "motdstart", "endofmotd", "nicknameinuse", "erroneusnickname",
    "nosuchnick", "nosuchchannel", "cannotsendtochan", "notonchannel", "chanoprivsneeded",
    "currenttopic", "notopic", "namreply", "whoisuser", "whoisserver", "away", "connect", "disconnect",
];

/// CTCP sub-commands the console prints.
pub const WATCHED_CTCP: &[&str] = &["action"];

/// Format an event as one console line, or `None` to stay quiet.
pub fn describe(ev: &Event) -> Option<String> {
    let from = ev.source();
    let text = match ev.command.as_str() {
        "privmsg" => format!("[{}] <{}> {}", ev.target(), from, ev.message()),
        "notice" => format!("-{}- {}", from, ev.message()),
        "ACTION" => format!("[{}] * {} {}", ev.target(), from, ev.message()),
        "join" => format!("*** {} has joined {}", from, ev.target()),
        "part" => format!("*** {} has left {} {}", from, ev.target(), ev.message()).trim_end().to_string(),
        "quit" => format!("*** {} has quit ({})", from, ev.target()),
        "nick" => format!("*** {} is now known as {}", from, ev.target()),
        "kick" => format!(
            "*** {} kicked {} from {} ({})",
            from,
            ev.message(),
            ev.target(),
            ev.args.get(2).map(String::as_str).unwrap_or("")
        ),
        "topic" => format!("*** {} set topic on {}: {}", from, ev.target(), ev.message()),
        "mode" => format!("*** {} sets mode {} on {}", from, ev.args.get(1..).unwrap_or(&[]).join(" "), ev.target()),
        "connect" => "*** Connected, registering...".to_string(),
        "disconnect" => "*** Disconnected.".to_string(),
        "error" => format!("!!! {}", ev.target()),
        // Numerics: drop our own nick and show the rest.
        _ => {
            let rest = ev.args.get(1..).unwrap_or(&[]);
            if rest.is_empty() {
                return None;
            }
            format!("*** {}", rest.join(" "))
        }
    };
    Some(format!("{} {}", Local::now().format("%H:%M"), text))
}
