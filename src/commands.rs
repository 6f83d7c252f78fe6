//! CLI Command Handlers
//!
//! Each handler takes its parsed args plus Output and returns an ExitCode.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use boxoffice::{BatchEntry, Config, MetadataClient};

use crate::cli::{BatchCmd, ConfigInitCmd, ExitCode, OmdbCmd, Output, TmdbCmd};

// =============================================================================
// Lookup Commands
// =============================================================================

pub async fn omdb_cmd(cmd: OmdbCmd, client: &MetadataClient, output: &Output) -> ExitCode {
    let label = cmd.imdb_id.as_deref().or(cmd.title.as_deref()).unwrap_or("");
    output.info(format!("Looking up on OMDB: {}", label));

    match client
        .lookup_omdb(cmd.title.as_deref(), cmd.imdb_id.as_deref())
        .await
    {
        Ok(movie) => print_or_fail(&movie, output),
        Err(e) => output.error(e.to_string(), ExitCode::from(&e)),
    }
}

pub async fn tmdb_cmd(cmd: TmdbCmd, client: &MetadataClient, output: &Output) -> ExitCode {
    match (cmd.movie_id, cmd.title.as_deref()) {
        (Some(id), _) => output.info(format!("Looking up on TMDB: #{}", id)),
        (None, Some(title)) => output.info(format!("Searching TMDB: {}", title)),
        (None, None) => {}
    }

    match client.lookup_tmdb(cmd.movie_id, cmd.title.as_deref()).await {
        Ok(movie) => print_or_fail(&movie, output),
        Err(e) => output.error(e.to_string(), ExitCode::from(&e)),
    }
}

/// Batch output: every entry is printed, failed ones included
#[derive(Serialize)]
#[serde(transparent)]
struct BatchReport(Vec<BatchEntry>);

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

pub async fn batch_cmd(cmd: BatchCmd, client: &MetadataClient, output: &Output) -> ExitCode {
    let titles = match cmd.all_titles() {
        Ok(titles) => titles,
        Err(e) => {
            return output.error(format!("Failed to read titles: {}", e), ExitCode::InvalidArgs)
        }
    };

    match client.batch_provider() {
        Some(provider) => output.info(format!(
            "Looking up {} title(s) on {}",
            titles.len(),
            provider
        )),
        None => output.info("No API key configured; every entry will fail"),
    }

    let report = BatchReport(client.lookup_batch(titles.as_slice()).await);
    let all_ok = report.0.iter().all(BatchEntry::is_success);

    if let Err(e) = output.print(&report) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }

    if all_ok {
        ExitCode::Success
    } else {
        ExitCode::Error
    }
}

fn print_or_fail<T: Serialize + fmt::Display>(data: &T, output: &Output) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Config Commands
// =============================================================================

/// Persist the keys given on the command line (or environment)
pub fn config_init_cmd(
    cmd: ConfigInitCmd,
    path: Option<&Path>,
    effective: &Config,
    output: &Output,
) -> ExitCode {
    let mut stored = match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    };

    for (slot, key) in [
        (&mut stored.omdb_api_key, &effective.omdb_api_key),
        (&mut stored.tmdb_api_key, &effective.tmdb_api_key),
    ] {
        if key.is_some() && (cmd.force || slot.is_none()) {
            *slot = key.clone();
        }
    }

    let saved = match path {
        Some(p) => stored.save_to(p).map(|_| p.to_path_buf()),
        None => stored.save(),
    };

    match saved {
        Ok(p) => {
            output.info(format!("Wrote {}", p.display()));
            print_or_fail(&ConfigView(stored.masked()), output)
        }
        Err(e) => output.error(format!("Failed to save config: {}", e), ExitCode::Error),
    }
}

pub fn config_show_cmd(effective: &Config, output: &Output) -> ExitCode {
    print_or_fail(&ConfigView(effective.masked()), output)
}

#[derive(Serialize)]
#[serde(transparent)]
struct ConfigView(Config);

impl fmt::Display for ConfigView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = toml::to_string_pretty(&self.0).map_err(|_| fmt::Error)?;
        write!(f, "{}", text.trim_end())
    }
}
