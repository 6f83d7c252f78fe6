//! boxoffice - movie box office lookups via OMDB and TMDB
//!
//! # Usage
//!
//! ```bash
//! export OMDB_API_KEY=...
//! boxoffice omdb --title "Inception"
//! boxoffice batch "Inception" "The Dark Knight" "Interstellar" --json
//! ```

mod cli;
mod commands;
mod logging;

use clap::Parser;

use boxoffice::{Config, MetadataClient};

use crate::cli::{Cli, Command, ConfigCmd, ExitCode, Output};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    run(cli).await.into()
}

/// Resolve configuration, then dispatch to the command handler
async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .with_overrides(cli.omdb_key.clone(), cli.tmdb_key.clone());

    let client = MetadataClient::new(config.client_config());

    match cli.command {
        Command::Omdb(cmd) => commands::omdb_cmd(cmd, &client, &output).await,

        Command::Tmdb(cmd) => commands::tmdb_cmd(cmd, &client, &output).await,

        Command::Batch(cmd) => commands::batch_cmd(cmd, &client, &output).await,

        Command::Config(ConfigCmd::Init(cmd)) => {
            commands::config_init_cmd(cmd, cli.config.as_deref(), &config, &output)
        }

        Command::Config(ConfigCmd::Show) => commands::config_show_cmd(&config, &output),
    }
}
