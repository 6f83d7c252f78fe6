//! CLI - Command Line Interface for boxoffice
//!
//! Every lookup the library offers is reachable from here. Output is
//! human-readable on a terminal and JSON otherwise.
//!
//! # Examples
//!
//! ```bash
//! boxoffice omdb --title "Inception"
//! boxoffice tmdb --movie-id 27205 --json
//! boxoffice batch "Inception" "The Dark Knight" "Interstellar"
//! boxoffice config init --omdb-key YOUR_KEY
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

use boxoffice::LookupError;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error (including a batch with failed entries)
    Error = 1,
    /// Invalid arguments or missing API key
    InvalidArgs = 2,
    /// Network or response parsing error
    NetworkError = 3,
    /// Provider has no such movie
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

impl From<&LookupError> for ExitCode {
    fn from(err: &LookupError) -> Self {
        match err {
            LookupError::MissingCredential(_)
            | LookupError::InvalidInput(_)
            | LookupError::NoApiKey => ExitCode::InvalidArgs,
            LookupError::Upstream(_) | LookupError::NotFound => ExitCode::NotFound,
            LookupError::SearchFailed(_) | LookupError::RequestFailed(_) => {
                ExitCode::NetworkError
            }
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// boxoffice - movie box office lookups via OMDB and TMDB
#[derive(Parser, Debug)]
#[command(
    name = "boxoffice",
    version,
    about = "Movie box office lookups via OMDB and TMDB",
    after_help = "EXAMPLES:\n\
                  boxoffice omdb -t Inception             Lookup by title on OMDB\n\
                  boxoffice omdb -i tt1375666             Lookup by IMDB id\n\
                  boxoffice tmdb -t Inception --json      Search then fetch on TMDB\n\
                  boxoffice batch Heat Ronin Collateral   Several titles in order"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log request details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// OMDB API key (overrides OMDB_API_KEY and the config file)
    #[arg(long, global = true)]
    pub omdb_key: Option<String>,

    /// TMDB API key (overrides TMDB_API_KEY and the config file)
    #[arg(long, global = true)]
    pub tmdb_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look a movie up on OMDB
    #[command(visible_alias = "o")]
    Omdb(OmdbCmd),

    /// Look a movie up on TMDB
    #[command(visible_alias = "t")]
    Tmdb(TmdbCmd),

    /// Look several titles up, one after another
    #[command(visible_alias = "b")]
    Batch(BatchCmd),

    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCmd),
}

/// OMDB lookup by title or IMDB id
#[derive(Args, Debug)]
pub struct OmdbCmd {
    /// Movie title (fuzzy match by OMDB)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// IMDB id, e.g. tt1375666 (wins over --title)
    #[arg(long, short = 'i')]
    pub imdb_id: Option<String>,
}

/// TMDB lookup by id, or by title via search
#[derive(Args, Debug)]
pub struct TmdbCmd {
    /// Movie title (first search hit is used)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// TMDB movie id, e.g. 27205
    #[arg(long, short = 'm')]
    pub movie_id: Option<u64>,
}

/// Batch lookup against whichever provider is configured (OMDB first)
#[derive(Args, Debug)]
pub struct BatchCmd {
    /// Titles to look up, in order
    #[arg(required_unless_present = "file")]
    pub titles: Vec<String>,

    /// Read additional titles from a file, one per line
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

impl BatchCmd {
    /// Positional titles followed by non-blank lines of the file
    pub fn all_titles(&self) -> anyhow::Result<Vec<String>> {
        let mut titles = self.titles.clone();
        if let Some(ref path) = self.file {
            let text = std::fs::read_to_string(path)?;
            titles.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from),
            );
        }
        Ok(titles)
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Write API keys to the config file
    Init(ConfigInitCmd),

    /// Print the effective configuration (keys masked)
    Show,
}

#[derive(Args, Debug)]
pub struct ConfigInitCmd {
    /// Overwrite keys already in the file
    #[arg(long)]
    pub force: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data: wrapped JSON, or the value's text rendering
    pub fn print<T: Serialize + fmt::Display>(&self, data: &T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", data);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
