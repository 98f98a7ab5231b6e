//! Line-oriented console for the `crabirc` binary: turns typed input into
//! protocol lines and incoming events into printable text.

pub mod display;
pub mod input;

use std::time::Duration;

use crate::irc::commands;
use input::{is_channel, parse_command, ParsedCommand, HELP};

/// What the binary should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(String),
    SendLater { delay: Duration, line: String },
    Quit { message: Option<String> },
    Print(String),
}

/// Console state: the channel or nick plain text goes to.
#[derive(Debug, Default)]
pub struct Console {
    current: Option<String>,
}

impl Console {
    pub fn new(current: Option<String>) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn plan(&mut self, line: &str) -> Vec<Action> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Vec::new();
        }

        if !line.starts_with('/') || line.starts_with("//") {
            // "//text" sends "/text" literally.
            let text = line.strip_prefix('/').filter(|t| t.starts_with('/')).unwrap_or(line);
            return match self.current.as_deref() {
                Some(target) => vec![Action::Send(commands::privmsg(target, text))],
                None => vec![no_target()],
            };
        }

        let Some(command) = parse_command(line) else {
            let word = line.split_whitespace().next().unwrap_or(line);
            return vec![Action::Print(format!("Unknown command: {}", word))];
        };

        match command {
            ParsedCommand::Join { channel, key } => {
                let line = commands::join(&channel, key.as_deref());
                self.current = Some(channel);
                vec![Action::Send(line)]
            }
            ParsedCommand::Part { channel, reason } => {
                let Some(channel) = channel.or_else(|| self.current.clone().filter(|c| is_channel(c))) else {
                    return vec![Action::Print("Not in a channel.".to_string())];
                };
                if self.current.as_deref() == Some(channel.as_str()) {
                    self.current = None;
                }
                vec![Action::Send(commands::part(&[&channel], reason.as_deref()))]
            }
            ParsedCommand::Query { target } => {
                let note = format!("Talking to {}", target);
                self.current = Some(target);
                vec![Action::Print(note)]
            }
            ParsedCommand::Nick { nick } => vec![Action::Send(commands::nick(&nick))],
            ParsedCommand::Msg { target, text } => vec![Action::Send(commands::privmsg(&target, &text))],
            ParsedCommand::Me { text } => match self.current.as_deref() {
                Some(target) => vec![Action::Send(commands::action(target, &text))],
                None => vec![no_target()],
            },
            ParsedCommand::Notice { target, text } => vec![Action::Send(commands::notice(&target, &text))],
            ParsedCommand::Quit { message } => vec![Action::Quit { message }],
            ParsedCommand::Help => HELP.iter().map(|l| Action::Print(l.to_string())).collect(),
            ParsedCommand::Kick { channel, user, reason } => {
                match channel.or_else(|| self.current.clone().filter(|c| is_channel(c))) {
                    Some(channel) => vec![Action::Send(commands::kick(&channel, &user, reason.as_deref()))],
                    None => vec![Action::Print("Not in a channel.".to_string())],
                }
            }
            ParsedCommand::Mode { target, modes } => vec![Action::Send(commands::mode(&target, &modes))],
            ParsedCommand::Topic { text } => match self.current.as_deref().filter(|c| is_channel(c)) {
                Some(channel) => vec![Action::Send(commands::topic(channel, text.as_deref()))],
                None => vec![Action::Print("Not in a channel.".to_string())],
            },
            ParsedCommand::Whois { nick } => vec![Action::Send(commands::whois(&[&nick]))],
            ParsedCommand::Who { target } => vec![Action::Send(commands::who(target.as_deref(), false))],
            ParsedCommand::Raw { command } => vec![Action::Send(command)],
            ParsedCommand::Ctcp { target, command, payload } => {
                vec![Action::Send(commands::ctcp(&target, &command, &payload))]
            }
            ParsedCommand::Later { secs, text } => match self.current.as_deref() {
                Some(target) => vec![Action::SendLater {
                    delay: Duration::from_secs(secs),
                    line: commands::privmsg(target, &text),
                }],
                None => vec![no_target()],
            },
        }
    }
}

fn no_target() -> Action {
    Action::Print("No current target: /join a channel or /query a nick first.".to_string())
}
