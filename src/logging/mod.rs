//! Diagnostics and the wire transcript.
//!
//! [`init_tracing`] installs the process-wide subscriber. [`Transcript`]
//! appends every line sent or received to a daily file named
//! `<server>_<date>.log` in the configured directory (default:
//! `~/.local/share/crabirc/logs/`).

use crate::config::LoggingConfig;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;

/// Install a fmt subscriber at `level`. Unknown levels fall back to `info`.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Which way a line went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Writes raw protocol lines to per-server daily log files.
///
/// File handles are cached for the lifetime of the transcript. A file that
/// cannot be opened is reported once and its lines are dropped.
pub struct Transcript {
    server: String,
    log_dir: PathBuf,
    file_handles: HashMap<String, Option<fs::File>>,
}

impl Transcript {
    /// `None` unless the transcript is enabled in `config`.
    pub fn from_config(config: &LoggingConfig, server: &str) -> Option<Self> {
        config
            .transcript
            .then(|| Self::new(expand_home(&config.log_dir), server))
    }

    pub fn new(log_dir: PathBuf, server: &str) -> Self {
        Self {
            server: sanitize(server),
            log_dir,
            file_handles: HashMap::new(),
        }
    }

    pub fn record(&mut self, direction: Direction, line: &str) {
        let now = chrono::Local::now();
        let filename = format!("{}_{}.log", self.server, now.format("%Y-%m-%d"));
        let arrow = match direction {
            Direction::Inbound => "<-",
            Direction::Outbound => "->",
        };

        let log_dir = &self.log_dir;
        let handle = self.file_handles.entry(filename).or_insert_with_key(|filename| {
            let _ = fs::create_dir_all(log_dir);
            let path = log_dir.join(filename);
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot open transcript");
                    None
                }
            }
        });

        if let Some(file) = handle {
            let _ = writeln!(file, "[{}] {} {}", now.format("%H:%M:%S"), arrow, line);
        }
    }
}

fn expand_home(dir: &str) -> PathBuf {
    match dir.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(dir)),
        None => PathBuf::from(dir),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_disabled_by_default() {
        assert!(Transcript::from_config(&LoggingConfig::default(), "irc.example.net").is_none());
    }

    #[test]
    fn test_transcript_appends_lines() {
        let dir = std::env::temp_dir().join(format!("crabirc-transcript-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut transcript = Transcript::new(dir.clone(), "irc.example.net:6697");
        transcript.record(Direction::Outbound, "NICK crab");
        transcript.record(Direction::Inbound, ":irc.example.net 001 crab :Welcome");

        let date = chrono::Local::now().format("%Y-%m-%d");
        let contents = fs::read_to_string(dir.join(format!("irc.example.net_6697_{}.log", date))).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("-> NICK crab"));
        assert!(lines[1].ends_with("<- :irc.example.net 001 crab :Welcome"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/log/irc"), PathBuf::from("/var/log/irc"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/logs"), home.join("logs"));
        }
    }
}
