use super::Overrides;
use crate::domain::ports::{Navigator, Notifier};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Parser)]
#[command(name = "gara-client")]
#[command(about = "Command-line client for the contest ranking server")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Server base URL (default http://localhost:8000)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Where the login session is kept")]
    pub session_file: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines on stderr")]
    pub log_json: bool,

    #[arg(long, short = 'y', help = "Answer yes to confirmation prompts")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and keep the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, help = "Keep the session for 30 days")]
        remember_me: bool,
    },
    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Submit any page form with raw field values
    Form {
        form_id: String,
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long, help = "Contest the form belongs to")]
        contest: Option<i64>,
    },
    DeleteContest {
        contest_id: i64,
    },
    DeleteTeam {
        contest_id: i64,
        team_id: i64,
    },
    /// Submit an answer for a team
    Answer {
        contest_id: i64,
        #[arg(long)]
        team: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// Choose the jolly question for a team
    Jolly {
        contest_id: i64,
        #[arg(long)]
        team: String,
        #[arg(long)]
        question: String,
    },
    /// Print the public link of a contest
    Link {
        contest_id: i64,
    },
    /// Show the contest countdown
    Countdown {
        contest_id: i64,
        #[arg(long, help = "Keep updating every second")]
        watch: bool,
    },
    /// Follow the ranking until Ctrl-C
    Ranking {
        contest_id: i64,
        #[arg(long, help = "Refresh interval in seconds")]
        interval: Option<u64>,
    },
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        let refresh_interval_seconds = match &self.command {
            Command::Ranking { interval, .. } => *interval,
            _ => None,
        };
        Overrides {
            base_url: self.base_url.clone(),
            session_file: self.session_file.clone(),
            timeout_seconds: self.timeout_seconds,
            refresh_interval_seconds,
        }
    }
}

/// Parses `name=value`. The value may itself contain `=`.
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}

/// Navigation has nowhere to go in a terminal; report where the browser
/// would have gone.
#[derive(Debug, Clone)]
pub struct TerminalNavigator {
    origin: String,
}

impl TerminalNavigator {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.origin, url.trim_start_matches('/'))
        }
    }
}

impl Navigator for TerminalNavigator {
    fn reload(&self) {
        tracing::debug!("Page reload requested");
    }

    fn assign(&self, url: &str) {
        println!("→ {}", self.absolute(url));
    }

    fn replace(&self, url: &str) {
        println!("→ {}", self.absolute(url));
    }

    fn push_state(&self) {}
}

#[derive(Debug, Clone, Default)]
pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{message} [s/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        is_yes(&line)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sì" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields() {
        assert_eq!(
            parse_field("start_time=2024-03-01T10:00").unwrap(),
            ("start_time".to_string(), "2024-03-01T10:00".to_string())
        );
        assert_eq!(parse_field("a=b=c").unwrap().1, "b=c");
        assert_eq!(parse_field("empty=").unwrap().1, "");
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn navigator_makes_urls_absolute() {
        let nav = TerminalNavigator::new("http://localhost:8000/");
        assert_eq!(nav.absolute("settings/4"), "http://localhost:8000/settings/4");
        assert_eq!(nav.absolute("/"), "http://localhost:8000/");
        assert_eq!(nav.absolute("https://x.org/a"), "https://x.org/a");
    }

    #[test]
    fn confirm_answers() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Yes "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(TerminalNotifier::new(true).confirm("sure?"));
    }

    #[test]
    fn ranking_interval_becomes_an_override() {
        let cli = CliConfig::parse_from([
            "gara-client",
            "--base-url",
            "http://gara.local",
            "ranking",
            "7",
            "--interval",
            "2",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("http://gara.local"));
        assert_eq!(overrides.refresh_interval_seconds, Some(2));
    }
}
